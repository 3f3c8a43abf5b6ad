use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "date_cell")]
    pub join_date: Option<NaiveDate>,
}

/// One spreadsheet row per member and period, exactly as ingestion stored it.
/// Every cell is free text and may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPerformanceRecord {
    pub member_id: Uuid,
    #[serde(rename = "p", deserialize_with = "cell")]
    pub present: Option<String>,
    #[serde(rename = "a", deserialize_with = "cell")]
    pub absent: Option<String>,
    #[serde(rename = "l", deserialize_with = "cell")]
    pub late: Option<String>,
    #[serde(rename = "m", deserialize_with = "cell")]
    pub medical: Option<String>,
    #[serde(rename = "s", deserialize_with = "cell")]
    pub substitute: Option<String>,
    #[serde(rename = "rgi", deserialize_with = "cell")]
    pub referrals_given_inside: Option<String>,
    #[serde(rename = "rgo", deserialize_with = "cell")]
    pub referrals_given_outside: Option<String>,
    #[serde(rename = "rri", deserialize_with = "cell")]
    pub referrals_received_inside: Option<String>,
    #[serde(rename = "rro", deserialize_with = "cell")]
    pub referrals_received_outside: Option<String>,
    #[serde(rename = "v", deserialize_with = "cell")]
    pub visitors: Option<String>,
    #[serde(rename = "1_2_1", deserialize_with = "cell")]
    pub one_to_ones: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub tyfcb: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub ceu: Option<String>,
    #[serde(rename = "t", deserialize_with = "cell")]
    pub testimonials: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub targeted_date: Option<String>,
}

// Spreadsheet exports mix numbers and strings in the same column.
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

fn date_cell<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = cell(deserializer)?;
    Ok(crate::metrics::normalize_date(raw.as_deref()))
}

fn counter_cell<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = cell(deserializer)?;
    let count = crate::metrics::normalize_counter("training_count", raw.as_deref());
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Counters after normalization. Missing or malformed cells are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceMetrics {
    pub absenteeism: u64,
    pub lateness: u64,
    pub referrals: u64,
    pub visitors: u64,
    pub tyfcb: u64,
    pub testimonials: u64,
    pub attendance_tally: u64,
    pub target_date: Option<NaiveDate>,
}

/// Everything the engine needs for one period report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringInput {
    pub member: MemberProfile,
    #[serde(default)]
    pub record: Option<RawPerformanceRecord>,
    #[serde(default, deserialize_with = "counter_cell")]
    pub training_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "absenteeism")]
    Absenteeism,
    #[serde(rename = "arriving on time")]
    ArrivingOnTime,
    #[serde(rename = "visitor")]
    Visitor,
    #[serde(rename = "referrals")]
    Referrals,
    #[serde(rename = "tyfcb")]
    Tyfcb,
    #[serde(rename = "testimonial")]
    Testimonial,
    #[serde(rename = "training")]
    Training,
}

impl Category {
    /// Report order.
    pub const ALL: [Category; 7] = [
        Category::Absenteeism,
        Category::ArrivingOnTime,
        Category::Visitor,
        Category::Referrals,
        Category::Tyfcb,
        Category::Testimonial,
        Category::Training,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absenteeism => "absenteeism",
            Self::ArrivingOnTime => "arriving on time",
            Self::Visitor => "visitor",
            Self::Referrals => "referrals",
            Self::Tyfcb => "tyfcb",
            Self::Testimonial => "testimonial",
            Self::Training => "training",
        }
    }

    pub fn is_tiered(self) -> bool {
        !matches!(self, Self::Absenteeism | Self::ArrivingOnTime)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status color shown next to a score. Serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorCode {
    Grey,
    Red,
    Yellow,
    Green,
}

impl ColorCode {
    pub fn code(self) -> u8 {
        match self {
            Self::Grey => 1,
            Self::Red => 2,
            Self::Yellow => 3,
            Self::Green => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }
}

impl Serialize for ColorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryResult {
    pub name: Category,
    pub current_score: u32,
    pub current_data: u64,
    pub color_code: ColorCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapValue {
    Amount(u64),
    NotApplicable,
}

impl Serialize for GapValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Amount(value) => serializer.serialize_u64(*value),
            Self::NotApplicable => serializer.serialize_str("-"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct GapCell {
    pub value: GapValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<ColorCode>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GapEntry {
    pub name: Category,
    #[serde(rename = "5_points")]
    pub five_points: GapCell,
    #[serde(rename = "10_points")]
    pub ten_points: GapCell,
    #[serde(rename = "15_points")]
    pub fifteen_points: GapCell,
    #[serde(rename = "20_points")]
    pub twenty_points: GapCell,
}

impl GapEntry {
    pub fn cells(&self) -> [(&'static str, &GapCell); 4] {
        [
            ("5_points", &self.five_points),
            ("10_points", &self.ten_points),
            ("15_points", &self.fifteen_points),
            ("20_points", &self.twenty_points),
        ]
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserInfo {
    pub chapter: Option<String>,
    pub target_month: Option<String>,
    pub name: String,
    pub total_score: u32,
    #[serde(rename = "wednesdayCount")]
    pub wednesday_count: u32,
    pub weeks: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub status: bool,
    pub message: String,
    pub performance: Vec<CategoryResult>,
    pub need_to_do: Vec<GapEntry>,
    pub user_info: UserInfo,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyCategoryScore {
    pub name: Category,
    pub current_score: u32,
    pub current_data: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPerformance {
    pub month: Option<String>,
    pub performance: Vec<MonthlyCategoryScore>,
    pub total_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryMember {
    pub name: String,
    pub chapter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
    pub status: bool,
    pub message: String,
    pub user_info: HistoryMember,
    pub reports: Vec<MonthlyPerformance>,
}
