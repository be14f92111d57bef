//! End-to-end: signatures recorded through a file-backed bucket survive a
//! restart and still prove the chain.

use anyhow::Result;
use block_sigs::{
    verify_chain_signatures, Block, BlockSignatureApi, Bucket, ChainVerificationError,
    FileBucketConfig, FileBucketEngine, HeaderHash, InMemoryChain, KVStoreError, MasterKeyPair,
    SignatureStore, SignatureStoreError, SignedBlock, BLOCK_SIGS_BUCKET,
};
use std::fs;
use std::path::Path;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn build_chain(len: u64) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    for seq in 0..len {
        let body = format!("tx-batch-{seq}").into_bytes();
        let block = match blocks.last() {
            None => Block::genesis(body, 1_700_000_000),
            Some(parent) => Block::new_child(parent, body, 1_700_000_000 + seq * 10),
        };
        blocks.push(block);
    }
    blocks
}

fn engine(dir: &Path) -> FileBucketEngine {
    FileBucketEngine::new(FileBucketConfig::for_testing(dir))
}

#[test]
fn signatures_survive_restart() -> Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let master = MasterKeyPair::generate(&mut rand::thread_rng());
    let blocks = build_chain(12);

    {
        let store = SignatureStore::open(&engine(dir.path()))?;
        for block in &blocks {
            let signature = master.sign(&block.header_hash())?;
            store.add_verified(&SignedBlock::new(block, signature), &master.public_key())?;
        }
    }

    let store = SignatureStore::open(&engine(dir.path()))?;
    let chain = InMemoryChain::new();
    for block in &blocks {
        chain.push(block.clone())?;
    }

    verify_chain_signatures(&master.public_key(), &chain, &store)?;
    Ok(())
}

#[test]
fn forged_signature_on_disk_is_caught_after_restart() -> Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let master = MasterKeyPair::generate(&mut rand::thread_rng());
    let attacker = MasterKeyPair::generate(&mut rand::thread_rng());
    let blocks = build_chain(5);

    {
        let store = SignatureStore::open(&engine(dir.path()))?;
        for (seq, block) in blocks.iter().enumerate() {
            let signer = if seq == 3 { &attacker } else { &master };
            let signature = signer.sign(&block.header_hash())?;
            store.add(&SignedBlock::new(block, signature))?;
        }
    }

    let store = SignatureStore::open(&engine(dir.path()))?;
    let chain = InMemoryChain::new();
    for block in &blocks {
        chain.push(block.clone())?;
    }

    let err = verify_chain_signatures(&master.public_key(), &chain, &store).unwrap_err();
    assert!(matches!(
        err,
        ChainVerificationError::SignatureInvalid { depth: 3, .. }
    ));
    Ok(())
}

#[test]
fn corrupt_value_on_disk_is_decode_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let master = MasterKeyPair::generate(&mut rand::thread_rng());
    let block = Block::genesis(b"genesis".to_vec(), 1_700_000_000);
    let hash = block.header_hash();

    let store = SignatureStore::open(&engine(dir.path()))?;
    store.add(&SignedBlock::new(&block, master.sign(&hash)?))?;
    store.bucket().put(hash.as_bytes(), b"not a signature")?;

    let reopened = SignatureStore::open(&engine(dir.path()))?;
    assert!(matches!(
        reopened.get(&hash),
        Err(SignatureStoreError::Decode { .. })
    ));
    Ok(())
}

#[test]
fn corrupt_bucket_file_fails_store_init() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let engine = engine(dir.path());
    fs::write(engine.bucket_path(BLOCK_SIGS_BUCKET), [0xFF, 0xFF, 0xFF])?;

    let err = SignatureStore::open(&engine).unwrap_err();

    assert_eq!(err.bucket, BLOCK_SIGS_BUCKET);
    assert!(matches!(err.source, KVStoreError::CorruptionError { .. }));
    Ok(())
}
