//! Value objects
//!
//! 参加者 ID、表示名、タップキー、タイムスタンプを型で区別します。

use std::{borrow::Cow, fmt};

use serde_json::Value;

/// 参加者 ID
///
/// 1 から始まる連番。プロセスの生存期間中は再利用されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(u64);

impl ParticipantId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// 次の ID
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 参加者の表示名
///
/// 検証・サニタイズは行わない。重複も許容する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 接続直後に割り当てられるデフォルト名（`Participant <id>`）
    pub fn default_for(id: ParticipantId) -> Self {
        Self(format!("Participant {}", id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// タップされたキー
///
/// クライアントが送ってきた JSON 値をそのまま保持し、ブロードキャストでは
/// 同じ値を返す。
#[derive(Debug, Clone, PartialEq)]
pub struct TapKey(Value);

impl TapKey {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// データグラムに埋め込むテキスト表現
    ///
    /// 文字列はエスケープせずそのまま、それ以外は JSON テキスト。
    /// 整数値の浮動小数点数は小数部を付けない（`1.0` → `1`）。
    pub fn as_datagram_text(&self) -> Cow<'_, str> {
        match &self.0 {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) if n.is_f64() => match n.as_f64() {
                // -0.0 + 0.0 == 0.0
                Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => {
                    Cow::Owned(format!("{:.0}", f + 0.0))
                }
                _ => Cow::Owned(n.to_string()),
            },
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl From<&str> for TapKey {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
