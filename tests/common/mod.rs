#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const INCIDENT_HEADER: &str = "Порядковый номер аварии;Начало аварии;Конец аварии;\
Точка отказа Сервис;Точка отказа Система;Точка отказа Проект;Затронуло;SLA;Обратились;\
Краткое описание аварии;Детальное описание аварии;Плановые работы;Недоступность;Услуга;\
Customer_care_user_id;Статус;% компенсации";

pub const REVENUE_HEADER: &str = "Customer_care_user_id;Выручка";

/// One incident-log line with the usual invariant values.
pub fn incident_line(id: &str, begin: &str, service: &str, customer: &str, pct: &str) -> String {
    format!(
        "{id};{begin};2023-03-01T12:30:15.000000;billing-01;Billing;Core;\
Affected: 42 customers;SLA 99%;7 calls;Outage in {{region A}} core system  ;\
Disk array failure;;full;{service};{customer};active;{pct}"
    )
}

pub fn write_inputs(dir: &Path, incidents: &[String], revenue: &[&str]) -> (PathBuf, PathBuf) {
    let incident_path = dir.join("incident_data.csv");
    let revenue_path = dir.join("revenue.csv");
    let mut body = vec![INCIDENT_HEADER.to_string()];
    body.extend(incidents.iter().cloned());
    fs::write(&incident_path, body.join("\n") + "\n").unwrap();
    let mut body = vec![REVENUE_HEADER.to_string()];
    body.extend(revenue.iter().map(|s| s.to_string()));
    fs::write(&revenue_path, body.join("\n") + "\n").unwrap();
    (incident_path, revenue_path)
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    (out, logs)
}
