#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;

use bzip2::write::BzEncoder;
use bzip2::Compression;
use clap::Parser;

use bsdiff_core::{encode_offt, Bsdiff};

/// Signature of the container this tool writes: a 16-byte magic, the
/// `offtout`-encoded target size, then one bzip2 stream carrying the raw
/// control/diff/extra records back to back. Grounded on the reference
/// `BSDIFF_EXECUTABLE` harness, which writes the three record kinds into
/// a single callback regardless of tag.
const MAGIC: &[u8; 16] = b"ENDSLEY/BSDIFF43";

#[derive(Parser)]
#[command(about = "bsdiff 4.x compatible binary delta compressor")]
struct Args {
    /// bzip2 compression level (1-9)
    #[arg(short = 'z', long, default_value_t = 9)]
    compress: u32,

    /// bound on the size of each write handed to the compressor
    #[arg(short = 'b', long, default_value_t = bsdiff_core::DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// source file, or "-" for stdin
    source: String,

    /// target file, or "-" for stdin
    target: String,

    /// patch file to write, or "-" for stdout
    patch: String,
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> io::Result<()> {
    if args.source == "-" && args.target == "-" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and target could not both be stdin",
        ));
    }

    let source = read_input(&args.source)?;
    let target = read_input(&args.target)?;

    let level = match args.compress {
        n @ 1..=9 => Compression::new(n),
        _ => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "compression level must be in range 1-9",
            ))
        }
    };

    let mut patch: Box<dyn Write> = if args.patch == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(fs::File::create(&args.patch)?)
    };

    let mut header = Vec::with_capacity(24);
    header.extend_from_slice(MAGIC);
    let mut size_buf = [0u8; 8];
    encode_offt(target.len() as i64, &mut size_buf);
    header.extend_from_slice(&size_buf);
    patch.write_all(&header)?;

    let differ = Bsdiff::new(&source)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?
        .buffer_size(args.buffer_size);

    let mut encoder = BzEncoder::new(patch, level);
    differ
        .compare(&target, &mut encoder)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    encoder.finish()?;

    Ok(())
}

fn read_input(name: &str) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if name == "-" {
        io::stdin().read_to_end(&mut buf)?;
    } else {
        buf = fs::read(name)?;
    }
    Ok(buf)
}
