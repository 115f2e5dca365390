use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const NO_INN: &str = "no_inn";
pub const NO_ORG: &str = "no_org";
pub const NO_ZN: &str = "no_zn";
pub const NO_ADR: &str = "no_adr";
pub const NO_SROK: &str = "no_srok";
pub const NO_PREFIX: &str = "no_prefix";

/// Fields extracted from one device export file.
///
/// Fields never found in the file keep their `NO_*` sentinel; the sentinels
/// end up verbatim in the summary lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub inn: String,
    pub org: String,
    pub zn: String,
    pub adr: String,
    pub prefix: String,
    pub srok: String,
    pub path: PathBuf,
}

impl DeviceRecord {
    /// A record with every field at its sentinel, prefix derived from the file name.
    pub fn empty(path: &Path) -> Self {
        Self {
            inn: NO_INN.to_string(),
            org: NO_ORG.to_string(),
            zn: NO_ZN.to_string(),
            adr: NO_ADR.to_string(),
            prefix: prefix_from_path(path),
            srok: NO_SROK.to_string(),
            path: path.to_path_buf(),
        }
    }

    pub fn has_inn(&self) -> bool {
        self.inn != NO_INN
    }

    pub fn register(&self) -> String {
        register_from_path(&self.path).unwrap_or_else(|| self.prefix.clone())
    }
}

/// Register name: the first `_`-separated token of the file name (`KH1` in
/// `KH1_kassir3_08.10.2025_0642640006114926.txt`).
pub fn register_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let register = name.split('_').next().unwrap_or_default().to_string();
    if register.is_empty() {
        None
    } else {
        Some(register)
    }
}

/// First two characters of the file name, uppercased.
pub fn prefix_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    prefix_from_name(&name)
}

pub fn prefix_from_name(name: &str) -> String {
    if name.is_empty() {
        return NO_PREFIX.to_string();
    }
    name.chars().take(2).collect::<String>().to_uppercase()
}

/// How records are grouped into summary lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GroupBy {
    /// One group per two-character store prefix.
    #[default]
    Prefix,
    /// One group per tax id, with the set of prefixes listed.
    Inn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Prefix(String),
    Indexes(Vec<String>),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Prefix(prefix) => f.write_str(prefix),
            GroupKey::Indexes(indexes) => {
                let quoted: Vec<String> = indexes.iter().map(|i| format!("'{}'", i)).collect();
                write!(f, "[{}]", quoted.join(", "))
            }
        }
    }
}

/// Aggregated view of the records sharing one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: GroupKey,
    pub inn: String,
    pub org: String,
    pub count: usize,
    pub adresses: Vec<String>,
    pub serials: Vec<String>,
    pub deadlines: Vec<String>,
    pub paths: Vec<PathBuf>,
}

impl Group {
    pub fn joined_addresses(&self) -> String {
        self.adresses.join("; ")
    }

    /// Registers contributing to this group, in first-seen order without repeats.
    pub fn registers(&self) -> Vec<String> {
        let mut registers: Vec<String> = Vec::new();
        for path in &self.paths {
            let register = register_from_path(path).unwrap_or_else(|| self.key.to_string());
            if !registers.contains(&register) {
                registers.push(register);
            }
        }
        registers
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub record_count: usize,
    pub groups: Vec<Group>,
    pub summary_text: String,
}

/// JSON body of the workflow start webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TaskPayload {
    pub rest_user_id: i64,
    pub title_task: String,
    pub address: String,
    pub description_task: String,
    pub location: String,
    pub days_deadline: String,
}

impl TaskPayload {
    pub fn for_group(user_id: i64, group: &Group) -> Self {
        let address = group.joined_addresses();
        Self {
            rest_user_id: user_id,
            title_task: format!("замена ФН {}", group.key),
            address: address.clone(),
            description_task: format!("заменить фн {}", group.registers().join(", ")),
            location: address,
            days_deadline: "1".to_string(),
        }
    }
}
