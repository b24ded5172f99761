//! Shared fakes for handler and job tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use dars_core::config::GatewayConfig;
use dars_scheduler::JobState;
use dars_timetable::{ExportFetcher, Refresher, ScheduleCache, TimetableError};
use rust_xlsxwriter::Workbook;
use tokio::sync::watch;

use crate::app::AppState;

/// Serves a full-week export unless `failing` is set.
pub struct FakePortal {
    pub calls: AtomicUsize,
    pub failing: AtomicBool,
}

impl FakePortal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl ExportFetcher for FakePortal {
    async fn fetch_raw(&self) -> dars_timetable::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TimetableError::Fetch("portal down".to_string()));
        }
        Ok(week_export())
    }
}

fn week_export() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let mut row = 0;
    for day in ["Dushanba", "Seshanba", "Chorshanba", "Payshanba", "Juma", "Shanba"] {
        for label in [day, "Предмет", "Math", "Art"] {
            sheet.write_string(row, 1, label).unwrap();
            row += 1;
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn refresher(portal: Arc<FakePortal>) -> Arc<Refresher> {
    Arc::new(Refresher::new(portal, Arc::new(ScheduleCache::new())))
}

pub fn state(portal: Arc<FakePortal>, access_key: Option<&str>) -> Arc<AppState> {
    let (_, refresh_state) = watch::channel(JobState::default());
    Arc::new(AppState::new(
        GatewayConfig {
            port: 0,
            bind: "127.0.0.1".to_string(),
            access_key: access_key.map(String::from),
            static_dir: "public".to_string(),
        },
        refresher(portal),
        refresh_state,
    ))
}
