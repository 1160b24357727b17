use crate::domain::model::{CallType, Origin};
use crate::input::{records, Fields};
use crate::utils::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkgroupRow {
    pub origin: Origin,
    pub name: String,
    pub dmr_id: u32,
    pub call_type: CallType,
}

fn parse_row(fields: &Fields<'_>) -> Result<TalkgroupRow, ParseError> {
    let name = fields.text(0, "talkgroup name")?;
    let raw_id = fields.get(1);

    // A trailing P marks a private call target.
    let (digits, call_type) = match raw_id.strip_suffix(['P', 'p']) {
        Some(digits) => (digits, CallType::Private),
        None => (raw_id, CallType::Group),
    };
    let dmr_id = digits
        .parse::<u32>()
        .map_err(|_| fields.error(format!("invalid DMR id '{}' for '{}'", raw_id, name)))?;

    Ok(TalkgroupRow {
        origin: fields.origin().clone(),
        name,
        dmr_id,
        call_type,
    })
}

/// Reads a `Talkgroups__*.csv` file: no header, each line `name,id` with an
/// optional `P` suffix on the id.
pub fn read_talkgroups<'a>(
    file: &'a str,
    contents: &'a str,
) -> impl Iterator<Item = Result<TalkgroupRow, ParseError>> + 'a {
    records(file, contents).map(move |row| {
        let (line, record) = row?;
        if record.len() != 2 {
            return Err(ParseError::new(
                file,
                line,
                format!("expected 2 columns (name,id), found {}", record.len()),
            ));
        }
        parse_row(&Fields::new(file, line, &record))
    })
}
