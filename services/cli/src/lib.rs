mod cli;
mod commands;

use hoa_letters::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
