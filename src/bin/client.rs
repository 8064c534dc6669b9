//! Interactive client for a running link-bundler server.
//!
//! Reads one command per line from stdin and prints the server's answers.

use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const USAGE: &str = "Usage:
\ttask
\tlinks <id> <link1> <link2> ...
\tstatus <id>
\tdownload <id>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Task,
    Links { id: String, links: Vec<String> },
    Status { id: String },
    Download { id: String },
}

impl Command {
    /// `None` for unknown commands and missing arguments
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "task" => Command::Task,
            "links" => {
                let id = words.next()?.to_string();
                let links: Vec<String> = words.map(str::to_string).collect();
                if links.is_empty() {
                    return None;
                }
                Command::Links { id, links }
            }
            "status" => Command::Status {
                id: words.next()?.to_string(),
            },
            "download" => Command::Download {
                id: words.next()?.to_string(),
            },
            _ => return None,
        };
        Some(command)
    }
}

struct Client {
    http: reqwest::Client,
    base: String,
    /// Where downloaded archives are saved
    out_dir: PathBuf,
}

impl Client {
    async fn run(&self, command: Command) -> Result<String, reqwest::Error> {
        let response = match &command {
            Command::Task => self.http.post(format!("{}/tasks", self.base)).send().await?,
            Command::Links { id, links } => {
                self.http
                    .post(format!("{}/tasks/{}/links", self.base, id))
                    .json(&serde_json::json!({ "links": links }))
                    .send()
                    .await?
            }
            Command::Status { id } => {
                self.http
                    .get(format!("{}/tasks/{}", self.base, id))
                    .send()
                    .await?
            }
            Command::Download { id } => {
                self.http
                    .get(format!("{}/tasks/{}/download", self.base, id))
                    .send()
                    .await?
            }
        };

        if !response.status().is_success() {
            return response.text().await;
        }

        match command {
            Command::Download { id } => {
                let bytes = response.bytes().await?;
                let path = self.out_dir.join(format!("{}.zip", id));
                Ok(match tokio::fs::write(&path, &bytes).await {
                    Ok(()) => format!("saved {} ({} bytes)", path.display(), bytes.len()),
                    Err(e) => format!("could not write {}: {}", path.display(), e),
                })
            }
            _ => response.text().await,
        }
    }
}

fn prompt() {
    print!("> ");
    std::io::stdout().flush().ok();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let client = Client {
        http: reqwest::Client::new(),
        base: base.trim_end_matches('/').to_string(),
        out_dir: PathBuf::from("."),
    };

    println!("{}", USAGE);
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            match Command::parse(&line) {
                Some(command) => match client.run(command).await {
                    Ok(output) => println!("{}", output),
                    Err(e) => println!("Error making request: {}", e),
                },
                None => println!("{}", USAGE),
            }
        }
        println!();
        prompt();
    }

    Ok(())
}
