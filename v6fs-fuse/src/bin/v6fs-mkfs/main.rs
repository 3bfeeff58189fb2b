mod cli;

use std::fs::{File, OpenOptions};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use block_dev::BlockDevice;
use clap::Parser;
use typed_bytesize::ByteSizeIec;
use v6fs::{FsBuilder, Geometry, BLOCK_SIZE};
use v6fs_fuse::BlockFile;

use crate::cli::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let geometry = Geometry::plan(cli.total_blocks, cli.inodes, cli.log_blocks)?;
    println!(
        "nmeta {} (boot, super, log blocks {} inode blocks {}, bitmap blocks {}) blocks {} total {}",
        geometry.meta_blocks,
        geometry.log_blocks,
        geometry.inode_table_blocks,
        geometry.bitmap_blocks,
        geometry.data_blocks,
        geometry.total_blocks,
    );

    let image_size = geometry.total_blocks as u64 * BLOCK_SIZE as u64;
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&cli.image)
        .with_context(|| format!("cannot create image {:?}", cli.image))?;
    fd.set_len(image_size)
        .with_context(|| format!("cannot size image {:?}", cli.image))?;
    log::info!("image {:?} is {}", cli.image, ByteSizeIec(image_size));

    let device: Arc<dyn BlockDevice> = Arc::new(BlockFile(Mutex::new(fd)));
    let mut builder = FsBuilder::create(device, geometry)?;

    for path in &cli.files {
        let name = path
            .to_str()
            .with_context(|| format!("input path {path:?} is not UTF-8"))?;
        let mut file =
            File::open(path).with_context(|| format!("cannot open input {path:?}"))?;
        builder
            .add_file(name, &mut file)
            .with_context(|| format!("cannot pack {path:?}"))?;
    }

    builder.finish()?;
    Ok(())
}
