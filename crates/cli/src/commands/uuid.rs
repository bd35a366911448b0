//! `propfill uuid ...`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use propfill_values::UuidValue;
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum UuidCommand {
    /// Random version 4 UUIDs
    V4 {
        /// 16 bytes of hex seed material to use instead of random bytes
        #[arg(long, conflicts_with = "count")]
        seed: Option<String>,
        /// How many to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Name-based version 3 UUID (MD5)
    V3(NameArgs),

    /// Name-based version 5 UUID (SHA-1)
    V5(NameArgs),

    /// Version 4 UUIDs whose first four bytes are the current Unix time
    Ordered {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Print the canonical form, version and integer pair of a UUID
    Inspect {
        /// UUID text, with or without hyphens or braces
        uuid: String,
    },

    /// Rebuild a UUID from its two signed 64-bit halves
    FromInts {
        #[arg(allow_negative_numbers = true)]
        high: i64,
        #[arg(allow_negative_numbers = true)]
        low: i64,
    },
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// dns, url, oid, x500, or any UUID
    #[arg(long, default_value = "dns", value_parser = parse_namespace)]
    pub namespace: UuidValue,
    pub name: String,
}

pub fn parse_namespace(text: &str) -> Result<UuidValue, String> {
    match text.to_ascii_lowercase().as_str() {
        "dns" => Ok(UuidValue::NAMESPACE_DNS),
        "url" => Ok(UuidValue::NAMESPACE_URL),
        "oid" => Ok(UuidValue::NAMESPACE_OID),
        "x500" => Ok(UuidValue::NAMESPACE_X500),
        _ => UuidValue::parse(text).map_err(|e| e.to_string()),
    }
}

/// Run a uuid subcommand and return the lines to print.
pub fn run(command: UuidCommand) -> Result<Vec<String>> {
    let lines = match command {
        UuidCommand::V4 { seed: Some(seed), .. } => {
            let bytes = hex::decode(seed.trim()).context("seed must be hex encoded")?;
            vec![UuidValue::generate_v4_from(&bytes)?.to_string()]
        }
        UuidCommand::V4 { seed: None, count } => {
            (0..count).map(|_| UuidValue::generate_v4().to_string()).collect()
        }
        UuidCommand::V3(args) => {
            vec![UuidValue::generate_v3(&args.namespace, &args.name).to_string()]
        }
        UuidCommand::V5(args) => {
            vec![UuidValue::generate_v5(&args.namespace, &args.name).to_string()]
        }
        UuidCommand::Ordered { count } => (0..count)
            .map(|_| UuidValue::generate_timestamp_ordered().to_string())
            .collect(),
        UuidCommand::Inspect { uuid } => {
            let value = UuidValue::parse(&uuid)?;
            let report = json!({
                "uuid": value.to_string(),
                "version": value.version(),
                "int_pair": value.to_int_pair(),
            });
            vec![serde_json::to_string_pretty(&report)?]
        }
        UuidCommand::FromInts { high, low } => {
            vec![UuidValue::from_int_pair(&[high, low])?.to_string()]
        }
    };

    tracing::debug!(count = lines.len(), "uuid command finished");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_accept_names_and_uuids() {
        assert_eq!(parse_namespace("DNS"), Ok(UuidValue::NAMESPACE_DNS));
        assert_eq!(parse_namespace("x500"), Ok(UuidValue::NAMESPACE_X500));
        assert_eq!(
            parse_namespace("6ba7b811-9dad-11d1-80b4-00c04fd430c8"),
            Ok(UuidValue::NAMESPACE_URL)
        );
        assert!(parse_namespace("example").is_err());
    }

    #[test]
    fn seeded_v4_is_deterministic() {
        let lines = run(UuidCommand::V4 {
            seed: Some("00".repeat(16)),
            count: 1,
        })
        .unwrap();
        assert_eq!(lines, vec!["00000000-0000-4000-8000-000000000000"]);
    }

    #[test]
    fn short_seed_is_an_error() {
        let err = run(UuidCommand::V4 {
            seed: Some("abcd".into()),
            count: 1,
        })
        .unwrap_err();
        assert!(err.to_string().contains("16 bytes"));
    }

    #[test]
    fn count_controls_output_length() {
        let lines = run(UuidCommand::Ordered { count: 3 }).unwrap();
        assert_eq!(lines.len(), 3);
        for line in lines {
            assert_eq!(UuidValue::parse(&line).unwrap().version(), 4);
        }
    }

    #[test]
    fn v5_uses_the_namespace() {
        let lines = run(UuidCommand::V5(NameArgs {
            namespace: UuidValue::NAMESPACE_DNS,
            name: "www.example.com".into(),
        }))
        .unwrap();
        assert_eq!(lines, vec!["2ed6657d-e927-568b-95e1-2665a8aea6a2"]);
    }

    #[test]
    fn inspect_and_from_ints_agree() {
        let report = run(UuidCommand::Inspect {
            uuid: "{6BA7B8109DAD11D180B400C04FD430C8}".into(),
        })
        .unwrap();
        let report: serde_json::Value = serde_json::from_str(&report[0]).unwrap();
        assert_eq!(report["uuid"], "6ba7b810-9dad-11d1-80b4-00c04fd430c8");
        assert_eq!(report["version"], 1);

        let high = report["int_pair"][0].as_i64().unwrap();
        let low = report["int_pair"][1].as_i64().unwrap();
        let rebuilt = run(UuidCommand::FromInts { high, low }).unwrap();
        assert_eq!(rebuilt, vec!["6ba7b810-9dad-11d1-80b4-00c04fd430c8"]);
    }

    #[test]
    fn invalid_uuid_is_reported() {
        assert!(run(UuidCommand::Inspect { uuid: "nope".into() }).is_err());
        assert!(run(UuidCommand::FromInts { high: -1, low: 0 }).is_err());
    }
}
