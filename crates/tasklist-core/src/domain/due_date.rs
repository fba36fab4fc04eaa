//! DueDate - 境界で検証済みの期限日
//!
//! `YYYY-MM-DD` のリテラルだけを受け付けます。
//! chrono の `NaiveDate::from_str` は桁数や符号に寛容なので、先に形を検査してから暦として解釈します。
//!
//! # 拒否される例
//! - `2024-12-32`（存在しない日）
//! - `2024/12/01`（区切り文字が違う）
//! - `20241201`（区切りなし）
//! - `20024-12-32`（年が 4 桁でない）

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const FORMAT: &str = "%Y-%m-%d";

/// A calendar date that was accepted at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DueDate(NaiveDate);

/// DueDateError は期限日の解析エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DueDateError {
    #[error("due_date must be formatted as YYYY-MM-DD, got {0:?}")]
    Malformed(String),

    #[error("due_date {0:?} is not a valid calendar date")]
    OutOfRange(String),
}

impl DueDate {
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<DueDate> for NaiveDate {
    fn from(value: DueDate) -> Self {
        value.0
    }
}

fn has_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl FromStr for DueDate {
    type Err = DueDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !has_date_shape(s) {
            return Err(DueDateError::Malformed(s.to_string()));
        }
        NaiveDate::parse_from_str(s, FORMAT)
            .map(Self)
            .map_err(|_| DueDateError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
