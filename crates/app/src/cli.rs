//! Command-line interface
//!
//! Each subcommand stands in for one screen: the hospital list, a hospital's
//! doctors and booking form, the appointments list and the profile.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use medbook_core::Category;

/// MedBook - hospital appointment booking
#[derive(Parser, Debug)]
#[command(name = "medbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "medbook.toml", env = "MEDBOOK_CONFIG")]
    pub config: PathBuf,

    /// Log filter, overriding the configured one (e.g. "debug", "medbook_net=trace")
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List hospitals with their doctor counts
    Hospitals,

    /// List the doctors at one hospital
    Doctors(DoctorsArgs),

    /// Log in and remember the session
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Forget the current session
    Logout,

    /// Book an appointment with a doctor
    Book(BookArgs),

    /// Show your appointments
    Appointments,

    /// Show the logged-in user
    Whoami,
}

#[derive(Args, Debug)]
pub struct DoctorsArgs {
    /// Hospital ID
    #[arg(long)]
    pub hospital: String,

    /// Only doctors in this category (e.g. "cardiology", "Dermatologist")
    #[arg(long)]
    pub category: Option<Category>,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "MEDBOOK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, env = "MEDBOOK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct BookArgs {
    /// Hospital ID
    #[arg(long)]
    pub hospital: String,

    /// Doctor ID
    #[arg(long)]
    pub doctor: String,

    /// Patient name; defaults to the logged-in user's name
    #[arg(long)]
    pub name: Option<String>,

    /// Patient email; defaults to the logged-in user's email
    #[arg(long)]
    pub email: Option<String>,

    /// Appointment date, YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    /// Appointment time, HH:MM
    #[arg(long)]
    pub time: String,
}
