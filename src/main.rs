use std::{env, fs, io};

use bytehuff::{
    compress, container::HEADER_LEN, decompress, read_header, CodeTable, FrequencyTable,
};

fn main() -> io::Result<()> {
    match env::args_os().nth(1) {
        Some(path) => compress_file(fs::read(path)?),
        None => {
            print_textbook_codes();
            Ok(())
        }
    }
}

/// The frequencies from the classic textbook example, and the codes they get.
fn print_textbook_codes() {
    let freq = FrequencyTable::from_counts([
        (b'a', 5),
        (b'b', 9),
        (b'c', 12),
        (b'd', 13),
        (b'e', 16),
        (b'f', 45),
    ]);

    for (symbol, code) in CodeTable::from_frequencies(&freq).iter() {
        let bits: String = code.iter().map(|bit| if *bit { '1' } else { '0' }).collect();
        println!("{}: {bits}", symbol as char);
    }
}

fn compress_file(data: Vec<u8>) -> io::Result<()> {
    let blob = compress(&data);
    let header = read_header(&blob)?;

    println!("header: {}", hex::encode(&blob[..HEADER_LEN]));
    println!(
        "{} -> {} bytes ({} codes, {} padding bits)",
        data.len(),
        blob.len(),
        header.table_entries,
        header.pad
    );
    if !data.is_empty() {
        println!("ratio: {:.3}", blob.len() as f64 / data.len() as f64);
    }

    if decompress(&blob)? != data {
        return Err(io::Error::new(io::ErrorKind::Other, "round trip mismatch"));
    }
    println!("round trip ok");

    Ok(())
}
