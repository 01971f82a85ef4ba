//! Shared test infrastructure for integration tests.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};

const SCRUBBED_ENV: [&str; 9] = [
    "FASTAPI_DEPLOY_API_URL",
    "FASTAPI_DEPLOY_TEMPLATES_DIR",
    "FASTAPI_DEPLOY_LOG",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "ALL_PROXY",
    "http_proxy",
    "https_proxy",
    "all_proxy",
];

/// Run the binary against `project` with `stdin` piped in as the operator's answers.
pub fn run_cli(project: &Path, args: &[&str], stdin: &str) -> Output {
    let missing_config = project.join("no-config.json");
    let mut command = Command::new(env!("CARGO_BIN_EXE_fastapi-deploy"));
    command
        .args(args)
        .arg("--dir")
        .arg(project)
        .arg("--config")
        .arg(&missing_config)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for key in SCRUBBED_ENV {
        command.env_remove(key);
    }
    let mut child = command.spawn().expect("spawn fastapi-deploy");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for fastapi-deploy")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Accept one HTTP request, reply with `body`, and return the raw request.
pub fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let url = format!(
        "http://{}/api/github-secrets",
        listener.local_addr().expect("addr")
    );
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        while !request_complete(&buf) {
            let read = stream.read(&mut chunk).expect("read request");
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write response");
        String::from_utf8_lossy(&buf).to_string()
    });
    (url, handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(header_end) = buf.windows(4).position(|window| window == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let body = &buf[header_end + 4..];
    match headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
    {
        Some(expected) => body.len() >= expected,
        None => body.ends_with(b"\r\n0\r\n\r\n"),
    }
}
