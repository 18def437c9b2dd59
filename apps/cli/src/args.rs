use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cleanup {
        days: Option<u32>,
    },
    Overall {
        user: String,
    },
    Tracker {
        user: String,
        tracker: String,
    },
    Logs {
        user: String,
        tracker: Option<String>,
        limit: u32,
        offset: u32,
    },
    Expenses {
        user: String,
        range: Option<String>,
        start: Option<String>,
        end: Option<String>,
        category: Option<String>,
        tracker: Option<String>,
    },
    Monthly {
        user: String,
        year: Option<i32>,
        tracker: Option<String>,
    },
    Settings {
        retention_days: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub command: Command,
}

const DEFAULT_LIMIT: u32 = 50;

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

#[derive(Default)]
struct Flags {
    user: Option<String>,
    tracker: Option<String>,
    days: Option<u32>,
    limit: Option<u32>,
    offset: Option<u32>,
    range: Option<String>,
    start: Option<String>,
    end: Option<String>,
    category: Option<String>,
    year: Option<i32>,
    retention_days: Option<u32>,
}

pub fn parse_from<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config = None;
    let mut command_name = None;
    let mut flags = Flags::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--config" => config = Some(PathBuf::from(value_for(&mut args, &arg)?)),
            "--user" => flags.user = Some(value_for(&mut args, &arg)?),
            "--tracker" => flags.tracker = Some(value_for(&mut args, &arg)?),
            "--days" => flags.days = Some(number_for(&mut args, &arg)?),
            "--limit" => flags.limit = Some(number_for(&mut args, &arg)?),
            "--offset" => flags.offset = Some(number_for(&mut args, &arg)?),
            "--range" => flags.range = Some(value_for(&mut args, &arg)?),
            "--start" => flags.start = Some(value_for(&mut args, &arg)?),
            "--end" => flags.end = Some(value_for(&mut args, &arg)?),
            "--category" => flags.category = Some(value_for(&mut args, &arg)?),
            "--year" => flags.year = Some(number_for(&mut args, &arg)?),
            "--retention-days" => flags.retention_days = Some(number_for(&mut args, &arg)?),
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if command_name.is_some() {
                    return Err(format!("unexpected argument: {value}"));
                }
                command_name = Some(value.to_string());
            }
        }
    }

    let command_name = command_name.ok_or_else(|| "missing command".to_string())?;
    let command = build_command(&command_name, flags)?;
    Ok(CliArgs { config, command })
}

fn build_command(name: &str, flags: Flags) -> Result<Command, String> {
    let command = match name {
        "cleanup" => Command::Cleanup { days: flags.days },
        "overall" => Command::Overall {
            user: required(flags.user, "--user")?,
        },
        "tracker" => Command::Tracker {
            user: required(flags.user, "--user")?,
            tracker: required(flags.tracker, "--tracker")?,
        },
        "logs" => Command::Logs {
            user: required(flags.user, "--user")?,
            tracker: flags.tracker,
            limit: flags.limit.unwrap_or(DEFAULT_LIMIT),
            offset: flags.offset.unwrap_or(0),
        },
        "expenses" => Command::Expenses {
            user: required(flags.user, "--user")?,
            range: flags.range,
            start: flags.start,
            end: flags.end,
            category: flags.category,
            tracker: flags.tracker,
        },
        "monthly" => Command::Monthly {
            user: required(flags.user, "--user")?,
            year: flags.year,
            tracker: flags.tracker,
        },
        "settings" => Command::Settings {
            retention_days: flags.retention_days,
        },
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(command)
}

fn value_for(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn number_for<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, String> {
    let value = value_for(args, flag)?;
    value
        .parse::<T>()
        .map_err(|_| format!("invalid {flag} value: {value}"))
}

fn required(value: Option<String>, flag: &str) -> Result<String, String> {
    value.ok_or_else(|| format!("{flag} is required"))
}

pub fn print_help() {
    println!(
        "Ledger usage maintenance\n\n\
Usage:\n  ledger-usage [--config <path>] <command> [options]\n\n\
Commands:\n  cleanup   [--days <n>]                        Purge usage events older than n days\n  \
overall   --user <id>                          Overall usage for a user\n  \
tracker   --user <id> --tracker <id>           Usage of one tracker\n  \
logs      --user <id> [--tracker <id>] [--limit <n>] [--offset <n>]\n  \
expenses  --user <id> [--range <name>] [--start <date>] [--end <date>]\n            \
[--category <id>] [--tracker <id>]         Expense summary and categories\n  \
monthly   --user <id> [--year <yyyy>] [--tracker <id>]\n  \
settings  [--retention-days <n>]               Show or update stored settings\n\n\
Options:\n  --config <path>  Config file (default $LEDGER_CONFIG or ./ledger-usage.toml)\n  \
-h, --help       Show this help message\n"
    );
}
