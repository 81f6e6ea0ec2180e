use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    NotFound,
    BadRequest,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    /// Effective status (HTTP status, or the envelope's status when the
    /// transport said 2xx but the body did not).
    pub status: Option<u16>,
    pub message: String,
    /// Structured validation errors, flattened to display strings.
    pub field_errors: Vec<String>,
}

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
            field_errors: Vec::new(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
            field_errors: Vec::new(),
        }
    }

    pub(crate) fn from_status(status: u16, message: Option<String>, field_errors: Vec<String>) -> Self {
        let kind = match status {
            400 | 422 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            _ => ApiErrorKind::Http,
        };

        Self {
            kind,
            status: Some(status),
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("Request failed ({status})")),
            field_errors,
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn envelope_status(v: &Value) -> Option<u16> {
    v.get("status")
        .or_else(|| v.get("statusCode"))
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
}

fn envelope_message(v: &Value) -> Option<String> {
    v.get("message")
        .or_else(|| v.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Flatten the shapes validators produce: `["msg"]`, `[{"msg": ..}]`,
/// `[{"field": .., "message": ..}]` or `{"field": "msg" | ["msg", ..]}`.
fn envelope_field_errors(v: &Value) -> Vec<String> {
    let Some(errors) = v.get("errors") else {
        return Vec::new();
    };

    let one = |item: &Value| -> Option<String> {
        match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => item
                .get("msg")
                .or_else(|| item.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    };

    match errors {
        Value::Array(items) => items.iter().filter_map(one).collect(),
        Value::Object(map) => map
            .values()
            .flat_map(|v| match v {
                Value::Array(items) => items.iter().filter_map(one).collect::<Vec<_>>(),
                other => one(other).into_iter().collect(),
            })
            .collect(),
        other => one(other).into_iter().collect(),
    }
}

/// Collapse every response shape the backend produces into one outcome.
///
/// The backend answers either flat (`{status, message, data}`) or with the
/// envelope wrapped one level down (`{data: {status, message, data}}`), and
/// sometimes reports failures with a 2xx transport status. Success yields the
/// innermost `data` payload (or the body itself when there is none).
pub(crate) fn normalize_response(http_status: u16, body: Value) -> ApiResult<Value> {
    let wrapped = body
        .get("data")
        .filter(|d| d.is_object() && envelope_status(d).is_some())
        .cloned();

    let (status_src, envelope) = match (&wrapped, envelope_status(&body)) {
        (_, Some(_)) => (body.clone(), body),
        (Some(inner), None) => (inner.clone(), inner.clone()),
        (None, None) => (Value::Null, body),
    };

    let status = if is_success(http_status) {
        envelope_status(&status_src).unwrap_or(http_status)
    } else {
        http_status
    };

    if !is_success(status) {
        return Err(ApiError::from_status(
            status,
            envelope_message(&envelope),
            envelope_field_errors(&envelope),
        ));
    }

    Ok(match envelope {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    })
}
