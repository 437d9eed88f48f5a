//! Tests for the `a2s-probe` binary: output and process exit status

use std::net::{SocketAddr, UdpSocket};
use std::process::{Command, Output};
use std::thread;

fn a2s_probe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_a2s-probe"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run a2s-probe")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Answers one unchallenged A2S_INFO request
fn spawn_info_server(players: u8, bots: u8) -> (SocketAddr, thread::JoinHandle<()>) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind fake server");
    let addr = socket.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 1500];
        let (_, client) = socket.recv_from(&mut buf).unwrap();

        let mut message = (-1i32).to_le_bytes().to_vec();
        message.extend_from_slice(&[0x49, 17]);
        message.extend_from_slice(b"Binary Server\0ctf_2fort\0tf\0Team Fortress\0");
        message.extend_from_slice(&440u16.to_le_bytes());
        message.extend_from_slice(&[players, 24, bots, b'd', b'l', 0, 1]);
        message.extend_from_slice(b"8622567\0");
        socket.send_to(&message, client).unwrap();
    });

    (addr, handle)
}

mod usage_tests {
    use super::*;

    #[test]
    fn no_arguments_prints_usage_and_fails() {
        let output = a2s_probe(&[]);
        assert_eq!(output.status.code(), Some(255));
        assert!(stdout(&output).contains("Usage:"));
    }

    #[test]
    fn help_exits_successfully() {
        let output = a2s_probe(&["--help"]);
        assert_eq!(output.status.code(), Some(0));
        let text = stdout(&output);
        assert!(text.contains("Usage:"));
        assert!(text.contains("Return code sources for -c"));
    }

    #[test]
    fn malformed_port_prints_message_and_usage() {
        let output = a2s_probe(&["-h", "127.0.0.1", "-p", "abc"]);
        assert_eq!(output.status.code(), Some(255));
        let text = stdout(&output);
        assert!(text.contains("abc"));
        assert!(text.contains("Usage:"));
    }

    #[test]
    fn missing_port_is_reported() {
        let output = a2s_probe(&["-h", "127.0.0.1"]);
        assert_eq!(output.status.code(), Some(255));
        assert!(stdout(&output).contains("Server port is not set. Specify it with -p."));
    }
}

mod run_tests {
    use super::*;

    #[test]
    fn players_minus_bots_becomes_exit_status() {
        let (addr, handle) = spawn_info_server(9, 2);
        let port = addr.port().to_string();

        let output = a2s_probe(&["-h", "127.0.0.1", "-p", &port, "-r", "0", "-c", "5"]);

        assert_eq!(output.status.code(), Some(7));
        assert!(stdout(&output).contains("(returned 7)"));
        handle.join().unwrap();
    }

    #[test]
    fn exhausted_retries_exit_with_failure() {
        // Bound but never read, so requests go unanswered
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = silent.local_addr().unwrap().port().to_string();

        let output = a2s_probe(&["-h", "127.0.0.1", "-p", &port, "-t", "50", "-r", "1"]);

        assert_eq!(output.status.code(), Some(255));
        let text = stdout(&output);
        assert!(text.contains("Failed to connect (attempt 1 of 2)"));
        assert!(text.contains("Failed to connect (attempt 2 of 2)"));
        assert!(text.contains("Retries exhausted after 2 attempts. Aborting..."));
        drop(silent);
    }
}
