//! Export Serializer Tests

use anyhow::Result;
use sales_pipeline::export::serialize;
use sales_pipeline::{normalize, Record, RecordSet, SourceFormat, Value};

#[test]
fn test_export_header_and_plain_cells() -> Result<()> {
    let records: RecordSet = vec![
        Record::from_pairs([
            ("Country", Value::from("US")),
            ("Revenue", Value::from(1234.5)),
            ("Year", Value::from(2021)),
        ]),
        Record::from_pairs([
            ("Country", Value::from("DE")),
            ("Revenue", Value::Null),
            ("Year", Value::from(2022)),
        ]),
    ]
    .into();

    let text = serialize(&records)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Country,Revenue,Year", "US,1234.5,2021", "DE,,2022"]);
    Ok(())
}

#[test]
fn test_export_empty_set() -> Result<()> {
    assert_eq!(serialize(&RecordSet::new())?, "");
    Ok(())
}

#[test]
fn test_export_header_is_field_union() -> Result<()> {
    let records: RecordSet = vec![
        Record::from_pairs([("Country", "US")]),
        Record::from_pairs([("Country", "DE"), ("State", "Bavaria")]),
    ]
    .into();

    let text = serialize(&records)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Country,State", "US,", "DE,Bavaria"]);
    Ok(())
}

#[test]
fn test_export_quotes_embedded_delimiters() -> Result<()> {
    let records: RecordSet =
        vec![Record::from_pairs([("Name", "Smith, John"), ("Note", "said \"hi\"")])].into();

    let text = serialize(&records)?;
    assert!(text.contains("\"Smith, John\""));
    assert!(text.contains("\"said \"\"hi\"\"\""));
    Ok(())
}

#[test]
fn test_delimited_round_trip_is_stable() -> Result<()> {
    let source = "Date,Country,State,Product_Category,Revenue,Profit,Year\n\
                  12/1/2021,United States,\"Washington, DC\",Bikes,\"$1,234.50\",120,2021\n\
                  12/2/2021,Germany,,Clothing,80,-4.25,2021\n";

    let first = normalize(source.as_bytes(), SourceFormat::Delimited)?;
    let exported = serialize(&first)?;
    let second = normalize(exported.as_bytes(), SourceFormat::Delimited)?;

    assert_eq!(first, second);
    assert_eq!(second.get(0).and_then(Record::revenue), Some(1234.5));
    assert_eq!(second.get(0).and_then(Record::state), Some("Washington, DC"));
    assert_eq!(serialize(&second)?, exported);
    Ok(())
}
