mod command_line;
mod constants;
mod contracts;
mod deploy;
mod utils;

use std::{
    io::{stderr, stdout},
    process::ExitCode,
};

use clap::Parser;
use command_line::CommandLine;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let result = match CommandLine::try_parse() {
        Ok(cmd) => cmd.execute(&mut stdout()).await,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => Err(e.into()),
    };
    ExitCode::from(deploy::exit_status(result, &mut stderr()))
}
