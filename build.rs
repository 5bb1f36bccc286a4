use std::env;

fn main() {
    // Load .env during build so credentials can be embedded in the binary.
    if let Err(e) = dotenvy::dotenv() {
        println!(
            "cargo:warning=BUILD.RS: Failed to load .env file: {}. Using system environment variables.",
            e
        );
    } else {
        println!("cargo:warning=BUILD.RS: Successfully loaded .env file for build");
    }

    // Embed at compile time via cargo:rustc-env; runtime env vars still win
    // inside the app (see get_env_var in lib.rs).
    if let Ok(api_key) = env::var("OPENROUTER_API_KEY") {
        println!("cargo:rustc-env=OPENROUTER_API_KEY={}", api_key);
        println!(
            "cargo:warning=Embedded OPENROUTER_API_KEY (length: {})",
            api_key.len()
        );
    } else {
        println!("cargo:warning=OPENROUTER_API_KEY not found in environment during build");
    }

    if let Ok(model) = env::var("OPENROUTER_MODEL") {
        println!("cargo:rustc-env=OPENROUTER_MODEL={}", model);
        println!("cargo:warning=Embedded OPENROUTER_MODEL ({})", model);
    }

    tauri_build::build()
}
