//! Compress and restore a sample text, logging each stage.
//!
//! Pass `debug` or `trace` as the first argument for per-stage logs.
//!
//! ```bash
//! cargo run -p haagenti-huffman --example compress_sample -- debug
//! ```

use haagenti_core::{Compressor, Decompressor};
use haagenti_huffman::{HeaderFormat, HuffmanCodec};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const SAMPLE: &str = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let level = match std::env::args().nth(1).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    for header in [HeaderFormat::Tree, HeaderFormat::Counts] {
        let codec = HuffmanCodec::with_header(header);
        let compressed = codec.compress(SAMPLE.as_bytes())?;
        let stats = Compressor::stats(&codec).unwrap_or_default();

        info!(
            header = header.name(),
            original = SAMPLE.len(),
            compressed = compressed.len(),
            header_bits = stats.header_bits,
            bits_per_symbol = stats.bits_per_symbol(),
            "compressed sample"
        );

        let restored = codec.decompress(&compressed)?;
        if restored != SAMPLE.as_bytes() {
            return Err("decompressed data does not match".into());
        }
        info!(header = header.name(), "round-trip verified");
    }

    Ok(())
}
