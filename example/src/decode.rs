use bytes::Bytes;
use postro_hstore::{DecodeError, Hstore, HstoreCodec, PgFormat, Result, SqlValue};

pub fn main(codec: HstoreCodec, input: String) -> Result<()> {
    let text = Bytes::from(input);

    let hstore: Hstore = codec
        .decode_value(PgFormat::Text, Some(text))?
        .ok_or(DecodeError::Null)?;

    let mut pairs = hstore.iter().collect::<Vec<_>>();
    pairs.sort();
    for (key, value) in pairs {
        match value {
            Some(value) => println!("{key:?} => {value:?}"),
            None => println!("{key:?} => NULL"),
        }
    }

    let binary = codec.encode(PgFormat::Binary, &hstore)?;
    println!("binary: {:02x?}", binary.as_slice().unwrap_or_default());

    let decoded: Option<Hstore> = codec.decode_value(PgFormat::Binary, binary.into_value())?;
    assert_eq!(decoded.as_ref(), Some(&hstore));

    match codec.decode_sql_value(PgFormat::Binary, codec.encode(PgFormat::Binary, &hstore)?.into_value())? {
        SqlValue::Text(text) => println!("text: {text}"),
        other => println!("unexpected {}", other.type_name()),
    }

    match serde_json::to_string(&hstore) {
        Ok(json) => println!("json: {json}"),
        Err(err) => tracing::warn!("{err}"),
    }

    Ok(())
}
