use std::{
    fmt::Write as _,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{format::DelayedFormat, DateTime, Local, NaiveDate};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("quote"));

/// 單次批量寫入的緩衝上限
const BATCH_BYTES: usize = 4096;
const LOG_DIR: &str = "log";

pub struct Logger {
    writer: Sender<LogMessage>,
}

impl Logger {
    fn new(log_name: &str) -> Self {
        let (tx, rx) = unbounded::<LogMessage>();
        let name = log_name.to_string();

        // 寫入檔案的操作使用另一個線程處理
        let spawned = thread::Builder::new()
            .name(format!("logger-{}", name))
            .spawn(move || write_loop(&name, rx));
        if let Err(why) = spawned {
            error_console(format!("Failed to spawn logger thread because {:?}", why));
        }

        Logger { writer: tx }
    }

    fn info(&self, log: String) {
        self.send(log::Level::Info, log);
    }

    fn warn(&self, log: String) {
        self.send(log::Level::Warn, log);
    }

    fn error(&self, log: String) {
        self.send(log::Level::Error, log);
    }

    fn debug(&self, log: String) {
        self.send(log::Level::Debug, log);
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(LogMessage::new(level, msg)) {
            error_console(why.to_string());
        }
    }
}

pub struct LogMessage {
    pub level: log::Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }
}

/// 目前輸出中的日誌檔，日期變更時換檔
struct DailyFile {
    date: NaiveDate,
    writer: BufWriter<File>,
}

fn write_loop(name: &str, rx: Receiver<LogMessage>) {
    let mut current: Option<DailyFile> = None;
    let mut line = String::with_capacity(BATCH_BYTES);

    for received in &rx {
        let date = received.created_at.date_naive();
        if current.as_ref().is_none_or(|f| f.date != date) {
            flush(&mut current, &mut line);
            current = open_daily_file(name, date);
        }

        if writeln!(
            &mut line,
            "{} {} {}",
            received.created_at.format("%F %X%.6f"),
            received.level,
            received.msg
        )
        .is_err()
        {
            continue;
        }

        if rx.is_empty() || line.len() >= BATCH_BYTES {
            flush(&mut current, &mut line);
        }
    }

    flush(&mut current, &mut line);
}

fn flush(current: &mut Option<DailyFile>, line: &mut String) {
    if line.is_empty() {
        return;
    }

    match current {
        Some(file) => {
            if let Err(why) = file.writer.write_all(line.as_bytes()) {
                error_console(format!(
                    "Failed to write to log file. because:{:?}\r\nmsg:{}",
                    why, line
                ));
            }

            if let Err(why) = file.writer.flush() {
                error_console(format!("Failed to flush log file. because:{:?}", why));
            }
        }
        // 無法開檔時改輸出到 console
        None => print!("{}", line),
    }

    line.clear();
}

fn open_daily_file(name: &str, date: NaiveDate) -> Option<DailyFile> {
    let path = get_log_path(name, date)?;
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => Some(DailyFile {
            date,
            writer: BufWriter::new(file),
        }),
        Err(why) => {
            error_console(format!("Failed to open log file {:?}: {}", path, why));
            None
        }
    }
}

fn get_log_path(name: &str, date: NaiveDate) -> Option<PathBuf> {
    let path = Path::new(LOG_DIR);

    if !path.exists() {
        fs::create_dir_all(path).ok()?;
    }

    let mut log_path = PathBuf::from(path);
    log_path.push(format!("{}_{}.log", date.format("%Y-%m-%d"), name));

    Some(log_path)
}

pub fn info_file_async<S: Into<String>>(log: S) {
    LOGGER.info(log.into());
}

pub fn warn_file_async<S: Into<String>>(log: S) {
    LOGGER.warn(log.into());
}

pub fn error_file_async<S: Into<String>>(log: S) {
    LOGGER.error(log.into());
}

pub fn debug_file_async<S: Into<String>>(log: S) {
    LOGGER.debug(log.into());
}

pub fn info_console<S: AsRef<str>>(log: S) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log.as_ref()
    );
}

pub fn error_console<S: AsRef<str>>(log: S) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log.as_ref()
    );
}
