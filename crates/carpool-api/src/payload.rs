//! Request payload decoding.
//!
//! Bodies are taken as untyped JSON (or form pairs) and checked field by
//! field so that each malformed shape gets its own message.

use serde_json::{Map, Value};

use carpool_core::{Car, Group, GroupId, Seats};

use crate::error::ApiError;

/// Decode `[{"id": 1, "seats": 4}, ...]`.
pub fn car_list(json: &Value) -> Result<Vec<Car>, ApiError> {
    let list = json
        .as_array()
        .ok_or_else(|| ApiError::bad_request("expected a list"))?;

    list.iter()
        .enumerate()
        .map(|(idx, element)| {
            let object = element.as_object().ok_or_else(|| {
                ApiError::bad_request(format!("expected the element on index {idx} to be an object"))
            })?;
            let at = format!(" on index {idx}");
            let id = field(object, "id", &at)?;
            let seats = field(object, "seats", &at)?;
            Ok(Car::new(
                integer(id, "id", &at)?,
                seats_integer(seats, "seats", &at)?,
            ))
        })
        .collect()
}

/// Decode `{"id": 1, "people": 4}`, with `people` in `1..=max_people`.
pub fn group(json: &Value, max_people: Seats) -> Result<Group, ApiError> {
    let object = json
        .as_object()
        .ok_or_else(|| ApiError::bad_request("expected an object"))?;

    let id = field(object, "id", "")?;
    let people = field(object, "people", "")?;
    let id = integer(id, "id", "")?;
    let people = seats_integer(people, "people", "")?;
    if !(1..=max_people).contains(&people) {
        return Err(ApiError::bad_request(format!(
            "expected people to be between 1 and {max_people}"
        )));
    }
    Ok(Group::new(id, people))
}

/// Decode a form body carrying exactly one `ID` parameter.
pub fn group_id(pairs: &[(String, String)]) -> Result<GroupId, ApiError> {
    let mut ids = pairs.iter().filter(|(key, _)| key == "ID").map(|(_, v)| v);
    let (Some(id), None) = (ids.next(), ids.next()) else {
        return Err(ApiError::bad_request(
            "expected one ID x-www-form-urlencoded parameter",
        ));
    };

    id.trim()
        .parse::<u64>()
        .map(GroupId)
        .map_err(|_| ApiError::bad_request("expected ID to be an integer"))
}

fn field<'a>(object: &'a Map<String, Value>, name: &str, at: &str) -> Result<&'a Value, ApiError> {
    match object.get(name) {
        Some(Value::Null) | None => Err(ApiError::bad_request(format!(
            "missing {name} attribute{at}"
        ))),
        Some(value) => Ok(value),
    }
}

fn integer(value: &Value, name: &str, at: &str) -> Result<u64, ApiError> {
    value
        .as_u64()
        .ok_or_else(|| ApiError::bad_request(format!("expected {name} to be an integer{at}")))
}

fn seats_integer(value: &Value, name: &str, at: &str) -> Result<Seats, ApiError> {
    integer(value, name, at)
        .ok()
        .and_then(|n| Seats::try_from(n).ok())
        .ok_or_else(|| ApiError::bad_request(format!("expected {name} to be an integer{at}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: ApiError) -> String {
        err.to_string()
    }

    #[test]
    fn decodes_car_list() {
        let cars = car_list(&json!([{"id": 1, "seats": 4}, {"id": 2, "seats": 6}])).unwrap();
        assert_eq!(cars, vec![Car::new(1, 4), Car::new(2, 6)]);
    }

    #[test]
    fn car_list_errors() {
        let cases = [
            (json!({}), "expected a list"),
            (json!([true]), "expected the element on index 0 to be an object"),
            (json!([{"seats": 4}]), "missing id attribute on index 0"),
            (json!([{"id": 1, "seats": 4}, {"id": 2}]), "missing seats attribute on index 1"),
            (json!([{"id": 1, "seats": "four"}]), "expected seats to be an integer on index 0"),
            (json!([{"id": "one", "seats": 4}]), "expected id to be an integer on index 0"),
            (json!([{"id": 1, "seats": -4}]), "expected seats to be an integer on index 0"),
        ];
        for (body, expected) in cases {
            assert_eq!(message(car_list(&body).unwrap_err()), expected);
        }
    }

    #[test]
    fn decodes_group() {
        assert_eq!(group(&json!({"id": 3, "people": 2}), 6).unwrap(), Group::new(3, 2));
        assert_eq!(group(&json!({"id": 3, "people": 6}), 6).unwrap(), Group::new(3, 6));
    }

    #[test]
    fn group_errors() {
        let cases = [
            (json!([]), "expected an object"),
            (json!({"people": 2}), "missing id attribute"),
            (json!({"id": 1}), "missing people attribute"),
            (json!({"id": 1, "people": 2.5}), "expected people to be an integer"),
            (json!({"id": null, "people": 2}), "missing id attribute"),
            (json!({"id": 1, "people": 0}), "expected people to be between 1 and 6"),
            (json!({"id": 1, "people": 7}), "expected people to be between 1 and 6"),
        ];
        for (body, expected) in cases {
            assert_eq!(message(group(&body, 6).unwrap_err()), expected);
        }
    }

    #[test]
    fn form_needs_exactly_one_id() {
        let pair = |k: &str, v: &str| (k.to_string(), v.to_string());

        assert_eq!(group_id(&[pair("ID", "7")]).unwrap(), GroupId(7));
        assert_eq!(
            message(group_id(&[]).unwrap_err()),
            "expected one ID x-www-form-urlencoded parameter"
        );
        assert_eq!(
            message(group_id(&[pair("ID", "1"), pair("ID", "2")]).unwrap_err()),
            "expected one ID x-www-form-urlencoded parameter"
        );
        assert_eq!(
            message(group_id(&[pair("ID", "x")]).unwrap_err()),
            "expected ID to be an integer"
        );
    }
}
