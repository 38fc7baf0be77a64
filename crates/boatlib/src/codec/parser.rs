//! Parser for directive-style line-record text.
//!
//! Reads blocks of the form `[TypeName] key=value; key=value; ...` into
//! untyped property bags, for inspecting existing game data. The block's type
//! name is stored under [`TYPE_KEY`]. Line comments start with `--`.
//!
//! Values are coerced in order: `true`/`false` (any case) to booleans, then
//! integers, then floats; anything else stays a trimmed string. A key seen
//! twice in one block becomes a list in encounter order.
//!
//! Malformed blocks are reported, never skipped.

use crate::error::ParseError;
use crate::model::{Properties, Value};

/// Key holding a parsed block's type name.
pub const TYPE_KEY: &str = "__type__";

/// Parses every block in `data`.
pub fn parse(data: &str) -> Result<Vec<Properties>, ParseError> {
    let stripped = strip_comments(data);
    let mut records = Vec::new();

    for (block, raw) in stripped.trim().split('[').enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let (name, body) = raw.split_once(']').ok_or_else(|| ParseError::MissingBracket {
            block,
            text: raw.trim().to_string(),
        })?;
        if body.contains(']') {
            return Err(ParseError::StrayBracket {
                block,
                text: raw.trim().to_string(),
            });
        }
        records.push(parse_block(name.trim(), body)?);
    }

    Ok(records)
}

fn parse_block(name: &str, body: &str) -> Result<Properties, ParseError> {
    let mut record = Properties::new();
    record.set(TYPE_KEY, name);

    for field in body.trim().split(';') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let (key, value) = field.split_once('=').ok_or_else(|| ParseError::MissingEquals {
            record: name.to_string(),
            field: field.to_string(),
        })?;
        record.append(key.trim(), parse_value(value));
    }

    Ok(record)
}

/// Coerces one raw field value.
pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Int(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        Value::Float(f)
    } else {
        Value::Str(raw.to_string())
    }
}

/// Removes `--` comments up to the end of each line.
fn strip_comments(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    for line in data.split_inclusive('\n') {
        match line.find("--") {
            Some(pos) => {
                out.push_str(&line[..pos]);
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => out.push_str(line),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_repeated_key_coercion() {
        let records = parse("[T] k=true; k=5; k=hello;").unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.get(TYPE_KEY), Some(&Value::from("T")));
        assert_eq!(
            r.get("k"),
            Some(&Value::List(vec![
                Value::Bool(true),
                Value::Int(5),
                Value::from("hello"),
            ]))
        );
    }

    #[test]
    fn test_multiple_blocks_and_comments() {
        let data = "\
-- header comment
[ItemType]
    ID=turnip; -- the root
    name=Turnip;
    sprite=0;
    scale=1.5;
[ItemReaction]
    ID=turnip;
    element=smash;
    consume=FALSE;
-- trailing";
        let records = parse(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("ID"), Some(&Value::from("turnip")));
        assert_eq!(records[0].get("sprite"), Some(&Value::Int(0)));
        assert_eq!(records[0].get("scale"), Some(&Value::Float(1.5)));
        assert_eq!(records[1].get(TYPE_KEY), Some(&Value::from("ItemReaction")));
        assert_eq!(records[1].get("consume"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_value_keeps_equals_after_first() {
        let records = parse("[Formula] formula=a=b+1;").unwrap();
        assert_eq!(records[0].get("formula"), Some(&Value::from("a=b+1")));
    }

    #[test]
    fn test_parses_encoded_output() {
        let record = crate::model::builder::ItemTypeBuilder::new("seed")
            .property("name", "Seed")
            .special("a")
            .special("b")
            .build();
        let parsed = parse(&record.encode()).unwrap();
        assert_eq!(parsed[0].get("ID"), Some(&Value::from("seed")));
        assert_eq!(parsed[0].get("special"), Some(&Value::from(vec!["a", "b"])));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  -- only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_bracket() {
        let err = parse("[T k=1;").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingBracket);
        assert_eq!(err.code().code(), "P001");

        let err = parse("junk [T] k=1;").unwrap_err();
        assert!(matches!(err, ParseError::MissingBracket { block: 0, .. }));
    }

    #[test]
    fn test_stray_bracket() {
        let err = parse("[T] k=1]; ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::StrayBracket);
    }

    #[test]
    fn test_missing_equals() {
        let err = parse("[T] k=1; oops;").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingEquals {
                record: "T".to_string(),
                field: "oops".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" True "), Value::Bool(true));
        assert_eq!(parse_value("-12"), Value::Int(-12));
        assert_eq!(parse_value("0.25"), Value::Float(0.25));
        assert_eq!(parse_value("rcfox_farming_crops"), Value::from("rcfox_farming_crops"));
    }

    proptest! {
        #[test]
        fn prop_integers_coerce(n in any::<i64>()) {
            let records = parse(&format!("[T] n={n};")).unwrap();
            prop_assert_eq!(records[0].get("n"), Some(&Value::Int(n)));
        }

        #[test]
        fn prop_words_stay_strings(w in "x[a-z_]{0,8}") {
            let records = parse(&format!("[T] w={w};")).unwrap();
            prop_assert_eq!(records[0].get("w"), Some(&Value::Str(w.clone())));
        }

        #[test]
        fn prop_repeats_accumulate(count in 1usize..6) {
            let body: String = (0..count).map(|i| format!("k={i};")).collect();
            let records = parse(&format!("[T] {body}")).unwrap();
            let value = records[0].get("k").unwrap();
            if count == 1 {
                prop_assert_eq!(value, &Value::Int(0));
            } else {
                prop_assert_eq!(value.as_list().map(<[Value]>::len), Some(count));
            }
        }
    }
}
