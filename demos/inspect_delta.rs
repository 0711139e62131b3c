use textdelta::reader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let old = "this is some test. blah blah blah";
    let new = "this is other text. blah blah blah";

    let delta = textdelta::encode(old, new)?;
    for inst in reader::instructions(&delta) {
        println!("{}", inst?);
    }

    let stats = reader::summarize(&delta)?;
    println!(
        "{} -> {} bytes as {} delta bytes ({} words, {} literal, {} deleted)",
        old.len(),
        new.len(),
        delta.len(),
        stats.control_words,
        stats.literal_bytes,
        stats.deleted_bytes
    );

    Ok(())
}
