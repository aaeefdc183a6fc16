//! The three HTTPS/CLI/FTP transports tried in order by [`crate::Downloader`].
//!
//! Grounded on `_download_cloudscraper`/`_download_requests`/`_download_wget`/
//! `_download_ftp` in the original. The cloudscraper analogue here is a
//! plain HTTPS client with a persistent cookie jar (this workspace carries
//! no JS-challenge-solving dependency; anti-bot defeat beyond cookie replay
//! is out of scope, matching spec.md's "sole subject... harvesting core").

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;

use harvester_metadata::random_user_agent;
use harvester_types::error::ErrorCode;

use crate::{cli_fetcher_command, Outcome};

fn write_response_body(
    response: reqwest::blocking::Response,
    local_path: &Path,
) -> std::io::Result<()> {
    let bytes = response.bytes().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(local_path, bytes)
}

pub fn download_scraper(
    client: &reqwest::blocking::Client,
    url: &str,
    local_path: &Path,
) -> Outcome {
    let response = match client
        .get(url)
        .header(reqwest::header::USER_AGENT, random_user_agent())
        .header(reqwest::header::ACCEPT, "application/pdf, text/html;q=0.9,*/*;q=0.8")
        .send()
    {
        Ok(r) => r,
        Err(_) => return Outcome::Fail(ErrorCode::TransientNetwork),
    };

    if !response.status().is_success() {
        return status_to_outcome(response.status());
    }
    match write_response_body(response, local_path) {
        Ok(()) => Outcome::Success,
        Err(_) => Outcome::Fail(ErrorCode::PayloadInvalid),
    }
}

pub fn download_direct(client: &reqwest::blocking::Client, url: &str, local_path: &Path) -> Outcome {
    let response = match client
        .get(url)
        .header(reqwest::header::USER_AGENT, random_user_agent())
        .send()
    {
        Ok(r) => r,
        Err(_) => return Outcome::Fail(ErrorCode::TransientNetwork),
    };

    if !response.status().is_success() {
        return status_to_outcome(response.status());
    }
    match write_response_body(response, local_path) {
        Ok(()) => Outcome::Success,
        Err(_) => Outcome::Fail(ErrorCode::PayloadInvalid),
    }
}

fn status_to_outcome(status: reqwest::StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::Fail(ErrorCode::TransientNetwork)
    } else {
        Outcome::Fail(ErrorCode::PermanentRemote)
    }
}

/// The external command-line fetcher, mirroring `_download_wget`'s flags:
/// 15s connect timeout, 5 retries, immediate retry on connection refused,
/// no certificate verification.
pub fn download_cli_fetcher(bin: &str, url: &str, local_path: &Path) -> Outcome {
    let status = cli_fetcher_command(bin, url, local_path).status();
    match status {
        Ok(s) if s.success() && local_path.is_file() => Outcome::Success,
        Ok(_) => Outcome::Fail(ErrorCode::TransientNetwork),
        Err(_) => Outcome::Fail(ErrorCode::NoUsableUrl),
    }
}

/// Minimal anonymous-login, passive-mode FTP client over a raw TCP socket
/// — the native equivalent of the original's `urllib.request.urlopen` FTP
/// handling, since the corpus carries no FTP client crate.
pub fn download_ftp(url: &str, local_path: &Path) -> Outcome {
    match download_ftp_inner(url, local_path) {
        Ok(()) => Outcome::Success,
        Err(_) => Outcome::Fail(ErrorCode::TransientNetwork),
    }
}

fn download_ftp_inner(url: &str, local_path: &Path) -> std::io::Result<()> {
    let without_scheme = url.strip_prefix("ftp://").unwrap_or(url);
    let (host, path) = without_scheme
        .split_once('/')
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing path"))?;
    let host_port = if host.contains(':') { host.to_string() } else { format!("{host}:21") };

    let mut control = TcpStream::connect(&host_port)?;
    read_ftp_reply(&mut control)?;

    send_ftp_command(&mut control, "USER anonymous\r\n")?;
    send_ftp_command(&mut control, "PASS anonymous@\r\n")?;
    send_ftp_command(&mut control, "TYPE I\r\n")?;

    let pasv_reply = send_ftp_command(&mut control, "PASV\r\n")?;
    let (data_host, data_port) = parse_pasv_reply(&pasv_reply, host)?;

    let mut data = TcpStream::connect((data_host.as_str(), data_port))?;
    send_ftp_command(&mut control, &format!("RETR /{path}\r\n"))?;

    let mut buf = Vec::new();
    data.read_to_end(&mut buf)?;
    std::fs::write(local_path, &buf)?;

    let _ = read_ftp_reply(&mut control);
    Ok(())
}

fn send_ftp_command(stream: &mut TcpStream, command: &str) -> std::io::Result<String> {
    stream.write_all(command.as_bytes())?;
    read_ftp_reply(stream)
}

fn read_ftp_reply(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
}

/// Parse a `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)` reply into a
/// host/port pair for the data connection.
fn parse_pasv_reply(reply: &str, fallback_host: &str) -> std::io::Result<(String, u16)> {
    let open = reply.find('(').ok_or_else(invalid_pasv)?;
    let close = reply.find(')').ok_or_else(invalid_pasv)?;
    let numbers: Vec<u16> =
        reply[open + 1..close].split(',').filter_map(|n| n.trim().parse().ok()).collect();
    if numbers.len() != 6 {
        return Err(invalid_pasv());
    }
    let host = format!("{}.{}.{}.{}", numbers[0], numbers[1], numbers[2], numbers[3]);
    let port = (numbers[4] << 8) | numbers[5];
    if host == "0.0.0.0" {
        Ok((fallback_host.to_string(), port))
    } else {
        Ok((host, port))
    }
}

fn invalid_pasv() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, "malformed PASV reply")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pasv_reply_extracts_host_and_port() {
        let (host, port) =
            parse_pasv_reply("227 Entering Passive Mode (192,168,1,5,200,50)", "ignored").unwrap();
        assert_eq!(host, "192.168.1.5");
        assert_eq!(port, 200 * 256 + 50);
    }

    #[test]
    fn parse_pasv_reply_rejects_malformed_input() {
        assert!(parse_pasv_reply("227 nope", "ignored").is_err());
    }
}
