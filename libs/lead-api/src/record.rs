use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ValidationError;

/// Обязательные поля в порядке проверки. Первое отсутствующее побеждает.
const REQUIRED_FIELDS: [&str; 4] = ["name", "city", "age", "phone"];

/// Значение `course`, если клиент курс не указал.
const NOT_SPECIFIED: &str = "לא צוין";

/// Метка источника по умолчанию.
pub const DEFAULT_SOURCE: &str = "website";

// ════════════════════════════════════════════════════════════════
//  FieldValue
// ════════════════════════════════════════════════════════════════

/// Значение обязательного поля: строка или число, как прислал клиент.
/// Сериализуется обратно в ту же JSON-форму.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    /// None для null, пустой строки, нуля и всего, что не строка и не число.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(FieldValue::Text(s.clone())),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(FieldValue::Number(n.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  LeadRecord
// ════════════════════════════════════════════════════════════════

/// Нормализованная заявка. Иммутабельна: создаётся один раз на запрос,
/// сериализуется и отправляется один раз.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    name: FieldValue,
    city: FieldValue,
    age: FieldValue,
    phone: FieldValue,
    course: String,
    /// Дубль `course` для колонки таблицы.
    course_name: String,
    source: String,
    timestamp: String,
}

impl LeadRecord {
    /// Единственный шаг валидации сырого тела запроса.
    ///
    /// Тело, не являющееся JSON-объектом, трактуется как пустой объект.
    /// `timestamp` из тела игнорируется: берётся `received_at`.
    pub fn validate(
        raw: &Value,
        received_at: DateTime<Utc>,
        default_source: &str,
    ) -> Result<Self, ValidationError> {
        let empty = Map::new();
        let map = raw.as_object().unwrap_or(&empty);

        let required = |field: &'static str| {
            map.get(field)
                .and_then(FieldValue::from_value)
                .ok_or(ValidationError::MissingField(field))
        };

        let [name, city, age, phone] = REQUIRED_FIELDS;
        let name = required(name)?;
        let city = required(city)?;
        let age = required(age)?;
        let phone = required(phone)?;

        let course = optional_text(map, &["course", "courseName"])
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());
        let source = optional_text(map, &["source"])
            .unwrap_or_else(|| default_source.to_string());

        Ok(Self {
            name,
            city,
            age,
            phone,
            course_name: course.clone(),
            course,
            source,
            timestamp: received_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    pub fn name(&self) -> &FieldValue {
        &self.name
    }

    pub fn city(&self) -> &FieldValue {
        &self.city
    }

    pub fn age(&self) -> &FieldValue {
        &self.age
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// ISO-8601 UTC, миллисекунды, суффикс `Z`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Телефон с замаскированными последними четырьмя символами.
    pub fn masked_phone(&self) -> String {
        let phone = self.phone.to_string();
        let len = phone.chars().count();
        let keep = len.saturating_sub(4);
        let mut masked: String = phone.chars().take(keep).collect();
        masked.extend(std::iter::repeat_n('*', len - keep));
        masked
    }
}

fn optional_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find_map(FieldValue::from_value)
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap()
    }

    fn valid() -> Value {
        json!({"name": "דני", "city": "חיפה", "age": "28", "phone": "0521234567"})
    }

    #[test]
    fn fills_course_and_source_defaults() {
        let record = LeadRecord::validate(&valid(), at(), DEFAULT_SOURCE).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["course"], "לא צוין");
        assert_eq!(json["courseName"], "לא צוין");
        assert_eq!(json["source"], "website");
        assert_eq!(json["name"], "דני");
    }

    #[test]
    fn first_missing_field_wins_in_order() {
        let record = LeadRecord::validate(&json!({}), at(), DEFAULT_SOURCE);
        assert_eq!(record, Err(ValidationError::MissingField("name")));

        let record = LeadRecord::validate(&json!({"name": "a", "phone": "1"}), at(), DEFAULT_SOURCE);
        assert_eq!(record, Err(ValidationError::MissingField("city")));

        let record = LeadRecord::validate(
            &json!({"name": "a", "city": "b", "phone": "1"}),
            at(),
            DEFAULT_SOURCE,
        );
        assert_eq!(record, Err(ValidationError::MissingField("age")));

        let record = LeadRecord::validate(
            &json!({"name": "a", "city": "b", "age": 30}),
            at(),
            DEFAULT_SOURCE,
        );
        assert_eq!(record, Err(ValidationError::MissingField("phone")));
    }

    #[test]
    fn empty_null_and_zero_count_as_missing() {
        for age in [json!(""), json!(null), json!(0), json!(true), json!(["28"])] {
            let mut body = valid();
            body["age"] = age;
            let err = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap_err();
            assert_eq!(err.to_string(), "Missing required field: age");
        }
    }

    #[test]
    fn non_object_body_reports_name() {
        let err = LeadRecord::validate(&json!([1, 2]), at(), DEFAULT_SOURCE).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("name"));
    }

    #[test]
    fn numeric_age_keeps_json_shape() {
        let mut body = valid();
        body["age"] = json!(28);
        let record = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap()["age"], json!(28));
    }

    #[test]
    fn course_name_is_used_when_course_absent() {
        let mut body = valid();
        body["courseName"] = json!("Barbering 101");
        body["source"] = json!("landing");
        let record = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap();
        assert_eq!(record.course(), "Barbering 101");
        assert_eq!(record.source(), "landing");

        body["course"] = json!("Advanced fades");
        let record = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap();
        assert_eq!(record.course(), "Advanced fades");
    }

    #[test]
    fn numeric_course_and_source_become_text() {
        let mut body = valid();
        body["course"] = json!(3);
        body["source"] = json!(7);
        let record = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["course"], json!("3"));
        assert_eq!(json["courseName"], json!("3"));
        assert_eq!(json["source"], json!("7"));
    }

    #[test]
    fn timestamp_is_server_assigned() {
        let mut body = valid();
        body["timestamp"] = json!("1999-01-01T00:00:00.000Z");
        let record = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap();
        assert_eq!(record.timestamp(), "2026-03-01T12:30:00.000Z");
    }

    #[test]
    fn masks_last_four_phone_characters() {
        let record = LeadRecord::validate(&valid(), at(), DEFAULT_SOURCE).unwrap();
        assert_eq!(record.masked_phone(), "052123****");

        let mut body = valid();
        body["phone"] = json!("123");
        let record = LeadRecord::validate(&body, at(), DEFAULT_SOURCE).unwrap();
        assert_eq!(record.masked_phone(), "***");
    }
}
