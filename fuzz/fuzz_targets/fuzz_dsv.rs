#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut rdr = dsv::Reader::from_reader(data);
    let rows = match rdr.rows().collect::<dsv::Result<Vec<_>>>() {
        Ok(rows) => rows,
        Err(_) => return,
    };

    // Anything that parses must survive a trip through the writer. A `\r\n`
    // terminator makes the writer quote bare carriage returns too.
    let format = dsv::FormatSpec {
        terminator: "\r\n".to_string(),
        ..dsv::FormatSpec::default()
    };
    let mut wtr =
        dsv::WriterBuilder::new().format(format.clone()).from_writer(vec![]);
    wtr.write_rows(&rows).unwrap();
    let out = wtr.into_inner().unwrap();
    let again = dsv::ReaderBuilder::new()
        .format(format)
        .from_reader(&out[..])
        .rows()
        .collect::<dsv::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(rows, again);
});
