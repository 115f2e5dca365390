use crate::domain::model::{
    DeviceRecord, Group, GroupBy, GroupKey, NO_ADR, NO_PREFIX, NO_SROK, NO_ZN,
};
use std::collections::{BTreeSet, HashMap};

/// Stable sort by (`inn`, `org`).
pub fn sort_records(records: &mut [DeviceRecord]) {
    records.sort_by(|a, b| (&a.inn, &a.org).cmp(&(&b.inn, &b.org)));
}

pub fn aggregate(mut records: Vec<DeviceRecord>, group_by: GroupBy) -> Vec<Group> {
    match group_by {
        GroupBy::Prefix => {
            sort_records(&mut records);
            group_by_prefix(&records)
        }
        GroupBy::Inn => group_by_inn(&records),
    }
}

/// Groups records by their two-character prefix.
///
/// The first record of a prefix seeds `inn`/`org`; every record appends its
/// address, so `count` is the number of records, duplicates included.
/// Groups come out in first-seen order.
pub fn group_by_prefix(records: &[DeviceRecord]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.prefix.as_str()).or_insert_with(|| {
            groups.push(Group {
                key: GroupKey::Prefix(record.prefix.clone()),
                inn: record.inn.clone(),
                org: record.org.clone(),
                count: 0,
                adresses: Vec::new(),
                serials: Vec::new(),
                deadlines: Vec::new(),
                paths: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.adresses.push(record.adr.clone());
        group.serials.push(record.zn.clone());
        if !group.deadlines.contains(&record.srok) {
            group.deadlines.push(record.srok.clone());
        }
        group.paths.push(record.path.clone());
        group.count = group.adresses.len();
    }

    groups
}

#[derive(Default)]
struct InnBucket {
    org: String,
    serials: BTreeSet<String>,
    adresses: BTreeSet<String>,
    prefixes: BTreeSet<String>,
    deadlines: BTreeSet<String>,
    paths: Vec<std::path::PathBuf>,
}

/// Whole-INN summary: one group per tax id.
///
/// Records without a tax id are dropped. `org` is the last one seen, `count`
/// is the number of distinct serials. Addresses, prefixes and deadlines are
/// distinct and sorted, sentinels left out. Groups are sorted by (`inn`, `org`).
pub fn group_by_inn(records: &[DeviceRecord]) -> Vec<Group> {
    let mut buckets: HashMap<String, InnBucket> = HashMap::new();

    for record in records.iter().filter(|r| r.has_inn()) {
        let bucket = buckets.entry(record.inn.clone()).or_default();
        bucket.org = record.org.clone();

        if record.zn != NO_ZN {
            bucket.serials.insert(record.zn.clone());
        }
        let adr = record.adr.trim();
        if !adr.is_empty() && adr != NO_ADR {
            bucket.adresses.insert(adr.to_string());
        }
        if record.prefix != NO_PREFIX {
            bucket.prefixes.insert(record.prefix.clone());
        }
        if record.srok != NO_SROK {
            bucket.deadlines.insert(record.srok.clone());
        }
        bucket.paths.push(record.path.clone());
    }

    let mut groups: Vec<Group> = buckets
        .into_iter()
        .map(|(inn, bucket)| Group {
            key: GroupKey::Indexes(bucket.prefixes.into_iter().collect()),
            inn,
            org: bucket.org,
            count: bucket.serials.len(),
            adresses: bucket.adresses.into_iter().collect(),
            serials: bucket.serials.into_iter().collect(),
            deadlines: bucket.deadlines.into_iter().collect(),
            paths: bucket.paths,
        })
        .collect();

    groups.sort_by(|a, b| (&a.inn, &a.org).cmp(&(&b.inn, &b.org)));
    groups
}
