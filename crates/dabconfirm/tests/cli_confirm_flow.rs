#![cfg(feature = "cli")]

use std::io::{BufRead, BufReader};
use std::net::{SocketAddr, TcpListener};
use std::process::{Child, Command, Output, Stdio};

use dabconfirm_server::{AckReply, ConfirmationClient};
use dabconfirm_store::Confirmation;

fn spawn_server(extra_args: &[&str]) -> (Child, SocketAddr) {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dabconfirm"));
    cmd.args(["--log-level", "error", "--format", "json"])
        .args(["serve", "--bind", "127.0.0.1:0"])
        .args(extra_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    let mut child = cmd.spawn().expect("serve command should start");
    let stdout = child.stdout.take().expect("child stdout should be piped");

    let mut line = String::new();
    BufReader::new(stdout)
        .read_line(&mut line)
        .expect("listening line should arrive");
    let value: serde_json::Value =
        serde_json::from_str(line.trim()).expect("listening line should be json");
    let addr = value["listening"]
        .as_str()
        .expect("listening field should be a string")
        .parse()
        .expect("listening address should parse");

    (child, addr)
}

fn run_confirm(addr: SocketAddr, dab_id: u64, technology: &str, sender: u64) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dabconfirm"))
        .args(["--log-level", "error", "--format", "json"])
        .args([
            "confirm",
            "--addr",
            &addr.to_string(),
            "--dab-id",
            &dab_id.to_string(),
            "--message-type",
            "4",
            "--technology",
            technology,
            "--sender",
            &sender.to_string(),
            "--arrived-at",
            "1693237436.5",
        ])
        .output()
        .expect("confirm command should run")
}

fn ack_json(output: &Output) -> serde_json::Value {
    assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("confirm output should be json")
}

#[test]
fn confirm_command_round_trips_against_serve() {
    let (mut server, addr) = spawn_server(&[]);

    let first = ack_json(&run_confirm(addr, 7, "WiFi", 2));
    assert_eq!(first["ack_information"], serde_json::json!([7, true]));
    assert_eq!(first["different_ack_information"], serde_json::json!([]));

    // A repeated dab_id is still acknowledged.
    let repeat = ack_json(&run_confirm(addr, 7, "AIS", 2));
    assert_eq!(repeat["ack_information"], serde_json::json!([7, true]));

    let _ = server.kill();
    let _ = server.wait();
}

#[test]
fn serve_supports_split_policy_for_library_clients() {
    let (mut server, addr) = spawn_server(&["--split-by-technology", "AIS"]);

    let mut client = ConfirmationClient::connect(addr).expect("client should connect");
    client
        .confirm(&Confirmation::new(1, 4, 100.0, "AIS", 5))
        .expect("first confirmation should be acknowledged");
    let reply = client
        .confirm(&Confirmation::new(3, 4, 102.0, "DAB", 5))
        .expect("second confirmation should be acknowledged");

    match reply {
        AckReply::TechnologySplit(ack) => {
            assert_eq!(ack.technology_ack_information, vec![(1, true)]);
            assert!(ack.invalid_ack_information.is_empty());
        }
        other => panic!("expected split ack, got {other:?}"),
    }
    client.disconnect().expect("disconnect should send");

    let _ = server.kill();
    let _ = server.wait();
}

#[test]
fn confirm_against_refused_port_exits_with_failure() {
    let probe = TcpListener::bind("127.0.0.1:0").expect("probe listener should bind");
    let addr = probe.local_addr().expect("probe should have addr");
    drop(probe);

    let output = run_confirm(addr, 1, "AIS", 5);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("connect failed"));
}
