use serde_json::Value;

use crate::collectors::CollectedJob;

pub const SOURCE: &str = "hiringcafe";

/// Map a single result from the search API into a CollectedJob.
///
/// Records without `v5_processed_job_data` are not job postings, and records
/// without an `objectID`/`requisition_id` cannot be upserted downstream; both
/// map to `None`.
pub fn map_job(raw: &Value) -> Option<CollectedJob> {
    let vpd = raw.get("v5_processed_job_data").filter(|v| is_present(v))?;
    let vcd = raw.get("v5_processed_company_data");
    let ji = raw.get("job_information");

    let source_id = [raw.get("objectID"), raw.get("requisition_id")]
        .into_iter()
        .find_map(id_value)?;

    let company_name = first_text(&[
        vpd.get("company_name"),
        vcd.and_then(|c| c.get("name")),
    ])
    .unwrap_or("Unknown")
    .to_string();

    let title = first_text(&[vpd.get("core_job_title"), ji.and_then(|j| j.get("title"))])
        .unwrap_or("Untitled")
        .to_string();

    Some(CollectedJob {
        company_name,
        title,
        url: text(raw.get("apply_url")),
        location: text(vpd.get("formatted_workplace_location")),
        remote_type: text(vpd.get("workplace_type")),
        salary_min: vpd.get("yearly_min_compensation").and_then(coerce_int),
        salary_max: vpd.get("yearly_max_compensation").and_then(coerce_int),
        salary_currency: text(vpd.get("listed_compensation_currency")),
        description: text(ji.and_then(|j| j.get("description"))),
        source: SOURCE.to_string(),
        source_id,
        raw_data: raw.clone(),
    })
}

/// Null, empty strings, empty arrays and empty objects count as missing.
fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(_) => true,
    }
}

fn id_value(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text<'a>(candidates: &[Option<&'a Value>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|v| v.and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

fn text(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str).map(String::from)
}

/// Salaries arrive as ints, floats or numeric strings; fractions are truncated.
fn coerce_int(v: &Value) -> Option<i32> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
            .or_else(|| n.as_f64().map(|f| f as i32)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i32),
        _ => None,
    }
}
