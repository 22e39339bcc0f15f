//! Reader for the vendor's `ArrayOf<Type>` XML collections.
//!
//! ```xml
//! <ArrayOfStudent xmlns:i="http://www.w3.org/2001/XMLSchema-instance">
//!   <Student>
//!     <DistinguishedName>CN=ab1234,OU=Students</DistinguishedName>
//!     <UserName>ab1234</UserName>
//!     <Disabled>false</Disabled>
//!     <Email i:nil="true"/>
//!   </Student>
//! </ArrayOfStudent>
//! ```
//!
//! Each child of the root becomes one [`RawRecord`]. Leaf elements become
//! string fields keyed by their local name; nested elements are flattened
//! with `.` (`Address.City`); self-closing and `nil` elements become
//! `null`, while `<Notes></Notes>` is an empty string. Text is kept as
//! written, surrounding whitespace included. Repeated siblings collect into
//! an array under their shared key.

use super::RawRecord;
use crate::error::{ConsoleError, ConsoleResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::Value;

const ROOT_PREFIX: &str = "ArrayOf";

/// Parse an `ArrayOf<Type>` document into records.
pub fn parse_array_of(xml: &str) -> ConsoleResult<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;
    // Open elements from the root down, with whether each has seen a child.
    let mut path: Vec<String> = Vec::new();
    let mut has_children: Vec<bool> = Vec::new();
    let mut nil = false;
    let mut text = String::new();
    let mut saw_root = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e);
                match path.len() {
                    0 => {
                        check_root(&name)?;
                        saw_root = true;
                    }
                    1 => current = Some(RawRecord::new()),
                    _ => {}
                }
                if let Some(parent) = has_children.last_mut() {
                    *parent = true;
                }
                nil = is_nil(e);
                path.push(name);
                has_children.push(false);
                text.clear();
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e);
                match path.len() {
                    0 => {
                        check_root(&name)?;
                        saw_root = true;
                    }
                    1 => records.push(RawRecord::new()),
                    _ => {
                        if let Some(parent) = has_children.last_mut() {
                            *parent = true;
                        }
                        if let Some(record) = current.as_mut() {
                            insert_field(record, field_key(&path, &name), Value::Null);
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| ConsoleError::xml(format!("invalid text content: {err}")))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(ref e)) => {
                text.push_str(&String::from_utf8_lossy(e));
            }
            Ok(Event::End(_)) => {
                let name = path.pop().unwrap_or_default();
                let had_children = has_children.pop().unwrap_or(false);
                match path.len() {
                    0 => {}
                    1 => {
                        if let Some(record) = current.take() {
                            records.push(record);
                        }
                    }
                    _ => {
                        if !had_children {
                            if let Some(record) = current.as_mut() {
                                let value = if nil {
                                    Value::Null
                                } else {
                                    Value::String(text.clone())
                                };
                                insert_field(record, field_key(&path, &name), value);
                            }
                        }
                    }
                }
                nil = false;
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ConsoleError::xml(format!(
                    "parse error at position {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ConsoleError::xml("document has no root element"));
    }
    if !path.is_empty() {
        return Err(ConsoleError::xml(format!(
            "document ended inside <{}>",
            path.join("/")
        )));
    }

    Ok(records)
}

fn check_root(name: &str) -> ConsoleResult<()> {
    if name.starts_with(ROOT_PREFIX) {
        Ok(())
    } else {
        Err(ConsoleError::xml(format!(
            "expected an {ROOT_PREFIX}<Type> root element, found <{name}>"
        )))
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().into_inner()).into_owned()
}

fn is_nil(e: &BytesStart<'_>) -> bool {
    e.attributes().flatten().any(|attr| {
        attr.key.local_name().into_inner() == b"nil" && attr.value.as_ref() == b"true"
    })
}

fn insert_field(record: &mut RawRecord, key: String, value: Value) {
    match record.get_mut(&key) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            record.insert(key, value);
        }
    }
}

/// `path` holds the root and record element first; the rest are parents.
fn field_key(path: &[String], name: &str) -> String {
    let parents = path.get(2..).unwrap_or_default();
    if parents.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parents.join("."), name)
    }
}
