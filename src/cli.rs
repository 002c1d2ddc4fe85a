use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Brain tumor screening for MRI images", long_about = None)]
pub struct Args {
    /// ONNX model path
    #[arg(long, env = "TUMOR_SCAN_MODEL", default_value = "models/brain_tumor_cnn.onnx")]
    pub model: PathBuf,

    /// patient record file
    #[arg(long, env = "TUMOR_SCAN_STORE", default_value = "data/patients.json")]
    pub store: PathBuf,

    /// run the model on CUDA instead of the CPU
    #[arg(long, env = "TUMOR_SCAN_CUDA")]
    pub cuda: bool,

    #[arg(long, env = "TUMOR_SCAN_USERNAME", default_value = "")]
    pub username: String,

    #[arg(long, env = "TUMOR_SCAN_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// username accepted at login
    #[arg(long, env = "TUMOR_SCAN_ADMIN_USER", default_value = "admin")]
    pub admin_user: String,

    /// password accepted at login
    #[arg(long, env = "TUMOR_SCAN_ADMIN_PASSWORD", default_value = "admin", hide_env_values = true)]
    pub admin_password: String,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// How to use the application
    Tutorial,

    /// Classify an MRI image and save the result
    Check {
        #[arg(long)]
        name: String,

        /// .jpg, .jpeg or .png file
        #[arg(long)]
        image: PathBuf,
    },

    /// List saved results
    History,

    /// Delete saved results, then show the history again
    #[command(group(ArgGroup::new("target").required(true).args(["name", "index"])))]
    Delete {
        /// delete every record with exactly this name
        #[arg(long)]
        name: Option<String>,

        /// row number from `history` (1-based)
        #[arg(long)]
        index: Option<usize>,
    },
}
