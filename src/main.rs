// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! frametag - label video frames from a fixed vocabulary.
//!
//! A small command-line driver over the annotation store. Every command that
//! changes labels saves the store before exiting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use frametag::{identity_of, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "frametag",
    version,
    about = "Toggle per-frame labels on videos and keep them in a JSON store"
)]
struct Cli {
    /// Store file holding the vocabulary and every video's labels
    #[arg(long, global = true, env = "FRAMETAG_STORE", default_value = "data.json")]
    store: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the store if needed and print the vocabulary
    Init,

    /// Print the content identity of a video file
    Hash { video: PathBuf },

    /// Show a video's explicit snapshots, or the labels in effect at one frame
    Show {
        video: PathBuf,

        #[arg(long)]
        frame: Option<u64>,
    },

    /// Toggle a label at a frame and save
    Toggle {
        video: PathBuf,

        #[arg(allow_negative_numbers = true)]
        frame: i64,

        label: String,
    },

    /// Remove every label of a video and save
    Clear { video: PathBuf },

    /// Export the store as YAML (.yaml/.yml) or JSON (.json)
    Export { output: PathBuf },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    if let Commands::Hash { video } = &cli.cmd {
        let identity =
            identity_of(video).with_context(|| format!("hashing {}", video.display()))?;
        println!("{identity}");
        return Ok(());
    }

    let mut session = Session::open(&cli.store)
        .with_context(|| format!("opening store {}", cli.store.display()))?;

    match cli.cmd {
        Commands::Hash { .. } => {}
        Commands::Init => {
            for label in session.vocabulary().iter() {
                println!("{label}");
            }
        }
        Commands::Show { video, frame } => {
            let identity = session.open_video(&video)?.clone();
            match frame {
                Some(frame) => {
                    if let Some(resolved) = session.effective_labels(frame) {
                        let marker = if resolved.inherited { " (inherited)" } else { "" };
                        println!("{frame}: {:?}{marker}", resolved.labels.as_slice());
                    }
                }
                None => {
                    if let Some(timeline) = session.store().timeline(&identity) {
                        println!("{identity}");
                        for (frame, labels) in timeline.entries() {
                            println!("{frame:>8}: {:?}", labels.as_slice());
                        }
                    }
                }
            }
        }
        Commands::Toggle {
            video,
            frame,
            label,
        } => {
            session.open_video(&video)?;
            if let Some(labels) = session.toggle_label(frame, &label)? {
                println!("{frame}: {:?}", labels.as_slice());
            }
            session.close()?;
        }
        Commands::Clear { video } => {
            session.open_video(&video)?;
            session.clear();
            session.close()?;
        }
        Commands::Export { output } => {
            session
                .store()
                .export(&output)
                .with_context(|| format!("exporting to {}", output.display()))?;
        }
    }

    Ok(())
}
