use std::io::{IsTerminal, Write};
use std::net::SocketAddr;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use dabconfirm_server::{AckInfo, AckReply, SnapshotDisplay};
use dabconfirm_store::Confirmation;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ListeningOutput<'a> {
    listening: &'a str,
}

/// Announce the bound address on stdout. Flushed immediately so callers
/// reading a pipe see it before the first connection.
pub fn print_listening(addr: SocketAddr, format: OutputFormat) {
    let mut out = std::io::stdout();
    let addr_text = addr.to_string();
    let line = match format {
        OutputFormat::Json => {
            let output = ListeningOutput {
                listening: &addr_text,
            };
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Raw => addr_text,
        OutputFormat::Table | OutputFormat::Pretty => format!("listening on {addr}"),
    };
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

pub fn print_reply(reply: &AckReply, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            println!(
                "{}",
                serde_json::to_string(reply).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!("{}", reply_table(reply));
        }
        OutputFormat::Pretty => {
            let (dab_id, valid) = reply.ack_information();
            match reply {
                AckReply::CrossTechnology(ack) => println!(
                    "ack dab_id={dab_id} valid={valid} correlated={}",
                    ack.different_ack_information.len()
                ),
                AckReply::TechnologySplit(ack) => println!(
                    "ack dab_id={dab_id} valid={valid} technology={} invalid={}",
                    ack.technology_ack_information.len(),
                    ack.invalid_ack_information.len()
                ),
            }
        }
    }
}

fn reply_table(reply: &AckReply) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ROLE", "DAB ID", "VALID"]);

    let (dab_id, valid) = reply.ack_information();
    table.add_row(vec![
        "acknowledged".to_string(),
        dab_id.to_string(),
        valid.to_string(),
    ]);

    match reply {
        AckReply::CrossTechnology(ack) => {
            add_pair_rows(&mut table, "correlated", &ack.different_ack_information);
        }
        AckReply::TechnologySplit(ack) => {
            add_pair_rows(&mut table, "technology", &ack.technology_ack_information);
            add_pair_rows(&mut table, "invalid", &ack.invalid_ack_information);
        }
    }
    table
}

fn add_pair_rows(table: &mut Table, role: &str, pairs: &[AckInfo]) {
    for (dab_id, valid) in pairs {
        table.add_row(vec![role.to_string(), dab_id.to_string(), valid.to_string()]);
    }
}

/// Live view for `serve --table`: prints the full confirmation table
/// after every handled frame.
pub struct ConfirmationTable;

impl SnapshotDisplay for ConfirmationTable {
    fn refresh(&self, confirmations: &[Confirmation]) {
        println!("{}", confirmations_table(confirmations));
    }
}

pub fn confirmations_table(confirmations: &[Confirmation]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "DAB ID",
            "TYPE",
            "ARRIVED AT",
            "TECHNOLOGY",
            "SENDER",
            "VALID",
        ]);
    for confirmation in confirmations {
        table.add_row(vec![
            confirmation.dab_id.to_string(),
            confirmation.message_type.to_string(),
            confirmation.arrived_at.to_string(),
            confirmation.technology.clone(),
            confirmation.sender.to_string(),
            confirmation.valid.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_table_lists_every_record() {
        let confirmations = vec![
            Confirmation::new(1, 4, 100.5, "AIS", 5),
            Confirmation::new(42, 2, 101.5, "WiFi", 9),
        ];
        let rendered = confirmations_table(&confirmations).to_string();

        assert!(rendered.contains("DAB ID"));
        assert!(rendered.contains("42"));
        assert!(rendered.contains("AIS"));
        assert!(rendered.contains("WiFi"));
    }

    #[test]
    fn reply_table_labels_correlated_rows() {
        let reply = AckReply::CrossTechnology(dabconfirm_server::CrossTechnologyAck {
            ack_information: (3, true),
            different_ack_information: vec![(1, true), (2, false)],
        });
        let rendered = reply_table(&reply).to_string();

        assert!(rendered.contains("acknowledged"));
        assert!(rendered.contains("correlated"));
        assert!(rendered.contains("false"));
    }
}
