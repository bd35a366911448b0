//! `propfill copy ...`

use std::io::Read;

use anyhow::{Context, Result, bail};
use clap::Args;
use propfill_core::{CopyOptions, HookErrorPolicy, Map, PropertyCopier, UnhookedPolicy, Value};

use crate::contact::Contact;

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// JSON object to copy from. Read from stdin when neither --json nor --set is given.
    #[arg(long)]
    pub json: Option<String>,

    /// Named value as key=value, applied after --json. The value is parsed as
    /// JSON when it can be, otherwise taken as a string.
    #[arg(long = "set", value_parser = parse_assignment)]
    pub set: Vec<(String, Value)>,

    /// Leave protected/private fields alone when the write hook does not handle them
    #[arg(long)]
    pub skip_unhooked: bool,

    /// Drop values the write hook rejects instead of failing
    #[arg(long)]
    pub ignore_hook_errors: bool,
}

impl CopyArgs {
    fn options(&self) -> CopyOptions {
        CopyOptions {
            on_hook_error: if self.ignore_hook_errors {
                HookErrorPolicy::Ignore
            } else {
                HookErrorPolicy::Propagate
            },
            unhooked: if self.skip_unhooked {
                UnhookedPolicy::Skip
            } else {
                UnhookedPolicy::AssignDirect
            },
        }
    }
}

pub fn parse_assignment(text: &str) -> Result<(String, Value), String> {
    let (key, raw) = text
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{text}'"))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn parse_object(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text).context("input is not valid JSON")? {
        Value::Object(members) => Ok(members),
        _ => bail!("input must be a JSON object"),
    }
}

/// Build a [`Contact`] from the arguments, reading stdin only when no other
/// source was given.
pub fn run(args: CopyArgs, mut stdin: impl Read) -> Result<Contact> {
    let copier = PropertyCopier::new().with_options(args.options());
    let mut contact = Contact::default();

    let json = match args.json {
        Some(ref text) => Some(text.clone()),
        None if args.set.is_empty() => {
            let mut text = String::new();
            stdin.read_to_string(&mut text).context("failed to read stdin")?;
            Some(text)
        }
        None => None,
    };

    if let Some(text) = json {
        let source = parse_object(&text)?;
        copier.copy_from_mapping(&mut contact, &source)?;
    }
    if !args.set.is_empty() {
        copier.copy_from_named_args(&mut contact, args.set)?;
    }

    tracing::info!(id = ?contact.id.map(|id| id.to_string()), "contact copied");
    Ok(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(json: Option<&str>, set: &[&str]) -> CopyArgs {
        CopyArgs {
            json: json.map(str::to_string),
            set: set.iter().map(|s| parse_assignment(s).unwrap()).collect(),
            skip_unhooked: false,
            ignore_hook_errors: false,
        }
    }

    #[test]
    fn assignment_values_are_json_when_possible() {
        assert_eq!(parse_assignment("age=36").unwrap(), ("age".into(), json!(36)));
        assert_eq!(parse_assignment("name=Ada").unwrap(), ("name".into(), json!("Ada")));
        assert_eq!(parse_assignment("note=a=b").unwrap(), ("note".into(), json!("a=b")));
        assert!(parse_assignment("novalue").is_err());
    }

    #[test]
    fn reads_stdin_when_nothing_else_is_given() {
        let contact = run(args(None, &[]), r#"{"email": "a@b.c", "age": 7.9}"#.as_bytes()).unwrap();
        assert_eq!(contact.email.as_deref(), Some("a@b.c"));
        assert_eq!(contact.age, Some(7));
    }

    #[test]
    fn set_overrides_json() {
        let contact = run(
            args(Some(r#"{"name": "Ada", "subscribed": true}"#), &["name=Grace"]),
            std::io::empty(),
        )
        .unwrap();
        assert_eq!(contact.name.map(|n| n.into_inner()), Some("Grace".to_string()));
        assert!(contact.subscribed);
    }

    #[test]
    fn invalid_keys_fail_before_copying() {
        let err = run(args(None, &["1st=x"]), std::io::empty()).unwrap_err();
        assert!(err.to_string().contains("1st"));
    }

    #[test]
    fn non_object_input_is_rejected() {
        assert!(run(args(Some("[1, 2]"), &[]), std::io::empty()).is_err());
        assert!(run(args(Some("{"), &[]), std::io::empty()).is_err());
    }

    #[test]
    fn skip_unhooked_is_honored() {
        let mut args = args(Some(r#"{"source_ref": "import-7"}"#), &[]);
        args.skip_unhooked = true;
        let contact = run(args, std::io::empty()).unwrap();
        assert_eq!(contact.source_ref(), None);
    }
}
