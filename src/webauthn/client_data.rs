use crate::error::SignatureError;

/// `"challenge":"` as it appears in client data JSON.
const CHALLENGE_MEMBER: &str = r#""challenge":""#;

/// `"type":` as it appears in client data JSON.
const TYPE_KEY: &str = r#""type":"#;

/// Returns the offset at which the `type` value (including its opening quote) starts.
///
/// The JSON is not parsed: authenticators emit the members in a loose order, and the validator
/// slices the raw bytes at this offset. Both `"challenge":"` and a string `type` member must be
/// present.
pub fn locate_response_type(client_data_json: &str) -> Result<usize, SignatureError> {
    if !client_data_json.contains(CHALLENGE_MEMBER) {
        return Err(SignatureError::UnexpectedClientDataShape("challenge"));
    }
    let type_key = client_data_json
        .find(TYPE_KEY)
        .filter(|idx| client_data_json[idx + TYPE_KEY.len()..].starts_with('"'))
        .ok_or(SignatureError::UnexpectedClientDataShape("type"))?;

    Ok(type_key + TYPE_KEY.len())
}
