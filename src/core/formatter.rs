use crate::domain::model::Group;

/// `<inn>, <org>, <count> шт., <key>[, addr1; addr2; ...]`
pub fn format_line(group: &Group) -> String {
    let mut line = format!(
        "{}, {}, {} шт., {}",
        group.inn, group.org, group.count, group.key
    );
    let addresses = group.joined_addresses();
    if !addresses.is_empty() {
        line.push_str(", ");
        line.push_str(&addresses);
    }
    line
}

/// Summary file contents: one newline-terminated line per group.
pub fn render_summary(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|group| format_line(group) + "\n")
        .collect()
}

/// Bold HTML chat message for one summary line.
pub fn chat_message(line: &str) -> String {
    format!("<b>заказ ФН:\n{}</b>", escape_html(line))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GroupKey;

    fn group(key: GroupKey, count: usize, adresses: &[&str]) -> Group {
        Group {
            key,
            inn: "123".to_string(),
            org: "A".to_string(),
            count,
            adresses: adresses.iter().map(|a| a.to_string()).collect(),
            serials: vec![],
            deadlines: vec![],
            paths: vec![],
        }
    }

    #[test]
    fn test_format_line_with_addresses() {
        let g = group(GroupKey::Prefix("KH".to_string()), 2, &["Addr1", "Addr2"]);
        assert_eq!(format_line(&g), "123, A, 2 шт., KH, Addr1; Addr2");
    }

    #[test]
    fn test_format_line_without_addresses() {
        let g = group(GroupKey::Indexes(vec!["KH".to_string()]), 0, &[]);
        assert_eq!(format_line(&g), "123, A, 0 шт., ['KH']");
    }

    #[test]
    fn test_format_line_keeps_sentinel_address() {
        let g = group(GroupKey::Prefix("KH".to_string()), 1, &["no_adr"]);
        assert_eq!(format_line(&g), "123, A, 1 шт., KH, no_adr");
    }

    #[test]
    fn test_render_summary_is_repeatable() {
        let groups = vec![
            group(GroupKey::Prefix("KH".to_string()), 2, &["Addr1", "Addr2"]),
            group(GroupKey::Prefix("PM".to_string()), 1, &["Perm"]),
        ];

        let first = render_summary(&groups);
        let second = render_summary(&groups);

        assert_eq!(first, second);
        assert_eq!(
            first,
            "123, A, 2 шт., KH, Addr1; Addr2\n123, A, 1 шт., PM, Perm\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_summary(&[]), "");
    }

    #[test]
    fn test_chat_message_is_bold_and_escaped() {
        assert_eq!(
            chat_message("1, A&B <ООО>, 1 шт., KH, x"),
            "<b>заказ ФН:\n1, A&amp;B &lt;ООО&gt;, 1 шт., KH, x</b>"
        );
    }
}
