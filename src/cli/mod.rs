pub mod add;
pub mod budget;
pub mod categories;
pub mod import;
pub mod init;
pub mod report;
pub mod transactions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "penny",
    about = "Personal budget tracker with category inference for bank statement imports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up Penny: choose a data directory and initialize the database.
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Add a single transaction by hand.
    Add {
        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        description: String,
        /// Negative for spending, positive for income
        #[arg(long, allow_hyphen_values = true)]
        amount: f64,
        /// Must be an existing category
        #[arg(long)]
        category: String,
        /// Bank transaction code, if known
        #[arg(long, default_value = "")]
        code: String,
    },
    /// Import a bank statement CSV and infer missing categories.
    Import {
        /// Path to the CSV file
        file: String,
        /// Skip the OpenAI classifier; rows nothing else can categorize
        /// are filed under "Other".
        #[arg(long)]
        offline: bool,
    },
    /// Manage categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Manage monthly budgets.
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
    /// List recent transactions.
    Transactions {
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
    /// Spending and budget summaries.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    List,
    Add {
        name: String,
        /// Mark as an income category
        #[arg(long)]
        income: bool,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set a category's monthly budget from a given month onward.
    Set {
        category: String,
        amount: f64,
        /// First month the budget applies to (YYYY-MM)
        #[arg(long)]
        month: String,
    },
    List,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Spend per category for a month, or the current year.
    Spend {
        /// Month to report on (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },
    /// Budget versus actual for a month.
    Budget {
        /// Month to report on (YYYY-MM)
        #[arg(long)]
        month: String,
    },
}
