//! Command-line inspector for IMS Common Cartridge packages.
//!
//! # Usage
//!
//! Show the course metadata and table of contents:
//! ```sh
//! cargo run --example cosyl -- course.imscc -m -I
//! ```
//!
//! List quizzes and extract a resource file:
//! ```sh
//! cargo run --example cosyl -- course.imscc --qtis -F syllabus_res -o out/
//! ```
//!
//! Set `RUST_LOG=imscc=debug` to see which files were skipped and why.

use clap::Parser;
use imscc::{Cartridge, ErrorPolicy, LoadOptions};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Inspect an IMS Common Cartridge
#[derive(Parser, Debug)]
#[command(name = "cosyl", about = "Inspect IMS Common Cartridge (.imscc) packages", version)]
struct Args {
    /// Cartridge to open
    #[arg(value_name = "CARTRIDGE")]
    input: PathBuf,

    /// Show metadata as serialized JSON
    #[arg(short = 'm', long)]
    metadata: bool,

    /// Dump a serialized JSON representation of the manifest
    #[arg(short = 'j', long)]
    json: bool,

    /// List all items with their associated resources
    #[arg(short = 'I', long)]
    items: bool,

    /// List all resources
    #[arg(short = 'r', long)]
    resources: bool,

    /// List all web links
    #[arg(long)]
    weblinks: bool,

    /// List all assignments
    #[arg(long)]
    assignments: bool,

    /// List all discussion topics
    #[arg(long)]
    topics: bool,

    /// List all quizzes
    #[arg(long)]
    qtis: bool,

    /// List all basic LTI links
    #[arg(long)]
    ltis: bool,

    /// Find the resource with this identifier
    #[arg(short = 'f', long, value_name = "ID")]
    find: Option<String>,

    /// Extract the first file of the resource with this identifier
    #[arg(short = 'F', long, value_name = "ID")]
    file: Option<String>,

    /// Directory extracted files are written to
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Fail on the first broken resource instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if args.strict { ErrorPolicy::Strict } else { ErrorPolicy::Lenient };
    let cartridge = Cartridge::open_with(&args.input, LoadOptions::new().with_error_policy(policy))?;
    tracing::info!(title = cartridge.title(), "loaded cartridge");

    if args.metadata {
        println!("{}", cartridge.metadata_json()?);
    }

    if args.items {
        println!("{}", serde_json::to_string(&cartridge.items()?)?);
    }

    if args.resources {
        for entry in cartridge.resources()? {
            let owner = entry.item.as_ref().map(|i| i.title.as_str()).unwrap_or("none");
            print!("{} [{}] item: {}", entry.identifier, entry.resource.kind(), owner);
            match &entry.decode_error {
                Some(reason) => println!(" error: {}", reason),
                None => println!(),
            }
        }
    }

    if args.weblinks {
        for link in cartridge.weblinks()? {
            println!("title: {} url: {}", link.title, link.href());
        }
    }

    if args.assignments {
        for assignment in cartridge.assignments()? {
            println!("title: {} points: {}", assignment.title, assignment.points_possible);
        }
    }

    if args.topics {
        for topic in cartridge.topics()? {
            println!("title: {} attachments: {}", topic.title, topic.attachments.len());
        }
    }

    if args.qtis {
        for quiz in cartridge.quizzes()? {
            println!("title: {} items: {}", quiz.title, quiz.question_count());
        }
    }

    if args.ltis {
        for lti in cartridge.external_tool_links()? {
            println!(
                "title: {} description: {} url: {}",
                lti.title,
                lti.description,
                lti.effective_launch_url()
            );
        }
    }

    if args.json {
        print!("{}", cartridge.to_json()?);
    }

    if let Some(id) = &args.find {
        println!("{:#?}", cartridge.find(id)?);
    }

    if let Some(id) = &args.file {
        let mut file = cartridge.find_file(id)?;
        println!("found: {}", file.file_name());

        fs::create_dir_all(&args.out_dir)?;
        let mut dst = File::create(args.out_dir.join(file.file_name()))?;
        io::copy(&mut file, &mut dst)?;
    }

    Ok(())
}
