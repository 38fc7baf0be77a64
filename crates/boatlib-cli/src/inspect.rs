//! Summaries of parsed line-record data.

use std::fmt::Write as _;

use boatlib::codec::TYPE_KEY;
use boatlib::{Properties, Value};

/// One line per record: type, id and field count, then a count per type.
pub fn summarize(records: &[Properties]) -> String {
    let mut out = String::new();
    let mut per_type: Vec<(String, usize)> = Vec::new();

    for record in records {
        let type_name = record.get(TYPE_KEY).map(ToString::to_string).unwrap_or_default();
        let id = match record.get("ID") {
            Some(Value::List(ids)) => ids.first().map(ToString::to_string).unwrap_or_default(),
            Some(v) => v.to_string(),
            None => "-".to_string(),
        };
        let fields = record.len().saturating_sub(1);
        let _ = writeln!(out, "[{type_name}] {id} ({fields} fields)");

        match per_type.iter_mut().find(|(t, _)| *t == type_name) {
            Some((_, n)) => *n += 1,
            None => per_type.push((type_name, 1)),
        }
    }

    let _ = writeln!(out, "{} records", records.len());
    for (type_name, n) in per_type {
        let _ = writeln!(out, "  {type_name}: {n}");
    }
    out
}

#[cfg(test)]
mod tests {
    use boatlib::parse;

    use super::*;

    #[test]
    fn test_summary() {
        let records = parse(
            "[ItemType] ID=turnip; name=Turnip; [ItemReaction] ID=turnip; element=smash; \
             [ItemType] ID=seeds; [DialogOption] text=Bye;",
        )
        .unwrap();
        let expected = "\
[ItemType] turnip (2 fields)
[ItemReaction] turnip (2 fields)
[ItemType] seeds (1 fields)
[DialogOption] - (1 fields)
4 records
  ItemType: 2
  ItemReaction: 1
  DialogOption: 1
";
        assert_eq!(summarize(&records), expected);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(summarize(&[]), "0 records\n");
    }
}
