use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use atlas_fetch::atlas::sample::write_sample_archive;
use atlas_fetch::atlas::YEO_2011;
use atlas_fetch::{fetch_atlas_yeo_2011_with, HttpFetcher, LabelTable};

const REMOTE_PATH: &str = "/pub/data/Yeo_JNeurophysiol11_MNI152.zip";

/// Minimal passive-mode FTP server for one file; records every command.
struct FtpServer {
    url: String,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FtpServer {
    fn start(body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("ftp://{}{REMOTE_PATH}", listener.local_addr().unwrap());
        let commands = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&commands);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                session(stream, &body, &seen);
            }
        });

        FtpServer { url, commands }
    }

    fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

fn reply(stream: &mut TcpStream, line: &str) {
    stream.write_all(format!("{line}\r\n").as_bytes()).unwrap();
}

fn session(mut control: TcpStream, body: &[u8], seen: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(control.try_clone().unwrap());
    let mut data: Option<TcpListener> = None;
    let mut offset = 0usize;
    reply(&mut control, "220 atlas mirror ready");

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let line = line.trim_end().to_string();
        seen.lock().unwrap().push(line.clone());
        let (cmd, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));

        match cmd.to_ascii_uppercase().as_str() {
            "USER" => reply(&mut control, "331 password required"),
            "PASS" => reply(&mut control, "230 logged in"),
            "TYPE" => reply(&mut control, "200 type set"),
            "REST" => {
                offset = arg.parse().unwrap();
                reply(&mut control, &format!("350 restarting at {offset}"));
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0").unwrap();
                let port = listener.local_addr().unwrap().port();
                data = Some(listener);
                reply(
                    &mut control,
                    &format!("227 Entering Passive Mode (127,0,0,1,{},{})", port / 256, port % 256),
                );
            }
            "RETR" if arg == REMOTE_PATH => {
                let listener = data.take().unwrap();
                reply(&mut control, "150 opening binary data connection");
                let (mut conn, _) = listener.accept().unwrap();
                conn.write_all(&body[offset..]).unwrap();
                drop(conn);
                offset = 0;
                reply(&mut control, "226 transfer complete");
            }
            "RETR" => reply(&mut control, "550 no such file"),
            "QUIT" => {
                reply(&mut control, "221 bye");
                return;
            }
            _ => reply(&mut control, "502 not implemented"),
        }
    }
}

fn sample_archive() -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sample_archive(&YEO_2011, dir.path()).unwrap();
    fs::read(path).unwrap()
}

#[test]
fn yeo_atlas_over_anonymous_ftp() {
    let server = FtpServer::start(sample_archive());
    let cache = tempfile::tempdir().unwrap();

    let bundle = fetch_atlas_yeo_2011_with(
        &HttpFetcher::new().unwrap(),
        Some(cache.path()),
        Some(&server.url),
        true,
        0,
    )
    .unwrap();

    for (key, path) in bundle.files() {
        assert!(path.is_file(), "{key} not on disk");
    }
    let colors = LabelTable::load(bundle.get("colors_7").unwrap()).unwrap();
    assert_eq!(colors.len(), 8);

    let commands = server.commands();
    assert!(commands.contains(&"USER anonymous".to_string()));
    assert!(commands.contains(&format!("RETR {REMOTE_PATH}")));
    assert!(!commands.iter().any(|c| c.starts_with("REST")));
}

#[test]
fn partial_ftp_download_is_resumed_with_rest() {
    let body = sample_archive();
    let half = body.len() / 2;
    let server = FtpServer::start(body.clone());
    let cache = tempfile::tempdir().unwrap();
    let dataset_dir = cache.path().join("yeo_2011");
    fs::create_dir_all(&dataset_dir).unwrap();
    fs::write(dataset_dir.join("Yeo_JNeurophysiol11_MNI152.zip.part"), &body[..half]).unwrap();

    let bundle = fetch_atlas_yeo_2011_with(
        &HttpFetcher::new().unwrap(),
        Some(cache.path()),
        Some(&server.url),
        true,
        0,
    )
    .unwrap();

    assert!(server.commands().contains(&format!("REST {half}")));
    assert!(bundle.get("anat").unwrap().is_file());
    assert!(!dataset_dir.join("Yeo_JNeurophysiol11_MNI152.zip.part").exists());
}
