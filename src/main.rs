mod classifier;
mod cli;
mod db;
mod error;
mod fmt;
mod fuzzy;
mod importer;
mod inference;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::{BudgetCommands, CategoriesCommands, Cli, Commands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Add {
            date,
            description,
            amount,
            category,
            code,
        } => cli::add::run(&date, &description, amount, &category, &code),
        Commands::Import { file, offline } => cli::import::run(&file, offline),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add {
                name,
                income,
                description,
            } => cli::categories::add(&name, income, description.as_deref()),
        },
        Commands::Budget { command } => match command {
            BudgetCommands::Set {
                category,
                amount,
                month,
            } => cli::budget::set(&category, amount, &month),
            BudgetCommands::List => cli::budget::list(),
        },
        Commands::Transactions { limit } => cli::transactions::run(limit),
        Commands::Report { command } => match command {
            ReportCommands::Spend { month } => cli::report::spend(month.as_deref()),
            ReportCommands::Budget { month } => cli::report::budget(&month),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
