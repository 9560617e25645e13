use std::process::ExitCode;

use graph_adapter::{graph_fs, Error, Filesystem, Storage};
use serde_json::Value;
use tokio::{fs::File, io::AsyncWriteExt};
use tokio_util::compat::TokioAsyncReadCompatExt;

mod config;

use config::AppConfig;

const USAGE: &str = "usage: graph-cli <command> [arguments]

commands:
    ls [dir]                 list a directory, `dir` defaulting to the current drive
    cat <path>               write a file to stdout
    put <local> <path>       upload a local file
    rm <path>                delete a file
    stat <path>              print the metadata of a file as json
    url <path>               print the web url of a file
    invite <path> <email>    grant someone read and write access
    mkdrive <name>           create a document library
    rmdrive <name>           permanently delete a document library";

enum Outcome {
    Done,
    NotFound,
    Usage,
}

async fn run(fs: &mut Filesystem, command: &str, args: &[String]) -> Result<Outcome, Error> {
    match (command, args) {
        ("ls", []) | ("ls", [_]) => {
            let dir = args.first().map_or("", String::as_str);

            for meta in fs.list_contents(dir).await? {
                println!("{:>12}  {}", meta.size, meta.path);
            }
        }
        ("cat", [path]) => match fs.read(path).await? {
            Some(contents) => tokio::io::stdout().write_all(&contents).await?,
            None => return Ok(Outcome::NotFound),
        },
        ("put", [local, path]) => {
            let file = File::open(local).await?;
            let size = file.metadata().await?.len();

            fs.write_stream(path, &mut file.compat(), size).await?;
        }
        ("rm", [path]) => {
            if !fs.delete(path).await? {
                return Ok(Outcome::NotFound);
            }
        }
        ("stat", [path]) => match fs.metadata(path).await {
            Ok(meta) => {
                let json = serde_json::to_value(meta).map_err(graph_fs::Error::from)?;

                return print_value(json);
            }
            Err(e) if e.is_not_found() => return Ok(Outcome::NotFound),
            Err(e) => return Err(e),
        },
        ("url", [path]) => return print_value(fs.call("getUrl", &[path.as_str().into()]).await?),
        ("invite", [path, email]) => {
            let args = [path.as_str().into(), email.as_str().into()];

            return print_value(fs.call("inviteUser", &args).await?);
        }
        ("mkdrive", [name]) => {
            return print_value(fs.call("createDrive", &[name.as_str().into()]).await?);
        }
        ("rmdrive", [name]) => {
            fs.call("deleteDrive", &[name.as_str().into()]).await?;
        }
        _ => return Ok(Outcome::Usage),
    }

    Ok(Outcome::Done)
}

/// Print a plugin result. `null` and `false` mean there was no such item.
fn print_value(value: Value) -> Result<Outcome, Error> {
    match value {
        Value::Null | Value::Bool(false) => Ok(Outcome::NotFound),
        Value::String(s) => {
            println!("{s}");
            Ok(Outcome::Done)
        }
        other => {
            println!("{other:#}");
            Ok(Outcome::Done)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let (command, args) = match args.split_first() {
        Some((command, args)) => (command.as_str(), args),
        None => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = AppConfig::from_env();

    let ctx = match config.create_context().await {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut fs = Filesystem::with_default_plugins(ctx);

    match run(&mut fs, command, args).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound) => {
            eprintln!("not found");
            ExitCode::FAILURE
        }
        Ok(Outcome::Usage) => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("{:?}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
