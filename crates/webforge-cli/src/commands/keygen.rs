use anyhow::Result;
use webforge_infrastructure::{KeyStore, LoadedConfig};

pub fn run(loaded: &LoadedConfig, bits: usize, force: bool) -> Result<()> {
    println!("🔑 Generating {}-bit RSA key pair...", bits);

    let keys = KeyStore::generate(bits)?;
    keys.write_pem_files(loaded.public_key_path(), loaded.private_key_path(), force)?;

    println!("✅ Key pair written");
    println!("  - public:  {}", loaded.public_key_path().display());
    println!("  - private: {}", loaded.private_key_path().display());
    println!("\n⚠️  Credentials saved under another key pair can no longer be decrypted.");
    Ok(())
}
