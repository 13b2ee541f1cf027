//! Bundled demo schedule, shown before the user has uploaded an image.

use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::event::{BoundingBox, ScheduleEvent};
use crate::timestamp::localize;

/// Language of the demo content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "vi")]
    Vietnamese,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "vi" | "vietnamese" => Ok(Language::Vietnamese),
            other => Err(format!("unsupported language '{}' (expected 'en' or 'vi')", other)),
        }
    }
}

struct DemoRow {
    day_offset: i64,
    start: (u32, u32),
    end: (u32, u32),
    confidence: f64,
    y: f64,
    color: &'static str,
    /// (title, location, instructor, note)
    en: [&'static str; 4],
    vi: [&'static str; 4],
}

const DEMO_ROWS: [DemoRow; 6] = [
    DemoRow {
        day_offset: 0,
        start: (9, 0),
        end: (10, 30),
        confidence: 0.95,
        y: 125.0,
        color: "#3b82f6",
        en: ["Project Kick-off", "Room 401", "Dr. Evelyn Reed", "Initial planning for the new mobile app."],
        vi: ["Khởi động dự án", "Phòng 401", "TS. Bùi Thị Thùy", "Lên kế hoạch ban đầu cho ứng dụng di động mới."],
    },
    DemoRow {
        day_offset: 1,
        start: (10, 0),
        end: (10, 15),
        confidence: 0.98,
        y: 245.0,
        color: "#22c55e",
        en: ["Team Standup", "Main Hall", "John Doe", "Daily progress update."],
        vi: ["Họp nhóm", "Sảnh chính", "Nguyễn Văn A", "Cập nhật tiến độ hàng ngày."],
    },
    DemoRow {
        day_offset: 1,
        start: (11, 0),
        end: (12, 30),
        confidence: 0.92,
        y: 365.0,
        color: "#f59e0b",
        en: ["Design Review", "Design Studio", "Jane Smith", "Review wireframes for v1."],
        vi: ["Đánh giá thiết kế", "Xưởng thiết kế", "Trần Thị B", "Xem lại wireframe cho phiên bản 1."],
    },
    DemoRow {
        day_offset: 2,
        start: (14, 0),
        end: (15, 0),
        confidence: 0.96,
        y: 485.0,
        color: "#8b5cf6",
        en: ["Client Meeting", "Virtual Call", "Dr. Evelyn Reed", "Present demo to stakeholders."],
        vi: ["Họp với khách hàng", "Cuộc gọi trực tuyến", "TS. Bùi Thị Thùy", "Trình bày demo cho các bên liên quan."],
    },
    DemoRow {
        day_offset: 3,
        start: (9, 30),
        end: (12, 0),
        confidence: 0.88,
        y: 605.0,
        color: "#0ea5e9",
        en: ["API Development", "Dev Area", "Mike Johnson", "Work on authentication endpoints."],
        vi: ["Phát triển API", "Khu vực dev", "Lê Văn C", "Làm việc trên các điểm cuối xác thực."],
    },
    DemoRow {
        day_offset: 3,
        start: (12, 0),
        end: (13, 0),
        confidence: 0.91,
        y: 725.0,
        color: "#f43f5e",
        en: ["Lunch & Learn", "Cafeteria", "Jane Smith", "Topic: State Management in React."],
        vi: ["Ăn trưa & Học hỏi", "Nhà ăn", "Trần Thị B", "Chủ đề: Quản lý trạng thái trong React."],
    },
];

/// The demo schedule, laid out over four days starting at `anchor`.
///
/// Times are wall-clock times in `tz`. Ids are `"1"` to `"6"` in table
/// order. The demo has no conflicts: the last two events touch but do not
/// overlap.
pub fn demo_events(language: Language, anchor: NaiveDate, tz: Tz) -> Vec<ScheduleEvent> {
    DEMO_ROWS
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let day = anchor + Duration::days(row.day_offset);
            let start = localize(day.and_time(wall_clock(row.start)?), tz)?;
            let end = localize(day.and_time(wall_clock(row.end)?), tz)?;
            let [title, location, instructor, note] = match language {
                Language::English => row.en,
                Language::Vietnamese => row.vi,
            };

            let mut event = ScheduleEvent::new((index + 1).to_string(), title, start, end);
            event.location = Some(location.to_string());
            event.instructor = Some(instructor.to_string());
            event.note = Some(note.to_string());
            event.ocr_confidence = row.confidence;
            event.bounding_box = BoundingBox {
                x: 55.0,
                y: row.y,
                width: 890.0,
                height: 110.0,
            };
            event.color = Some(row.color.to_string());
            Some(event)
        })
        .collect()
}

fn wall_clock((hour, minute): (u32, u32)) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}
