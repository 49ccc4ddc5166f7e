// Build-Script: Backt Netzwerk-Konfiguration ein und setzt die Linker-Skripte

/// Variablen aus `.env`, die zur Compile-Zeit an `env!()` weitergereicht werden
const FORWARDED_VARS: &[&str] = &[
    "WIFI_SSID",
    "WIFI_PASSWORD",
    "WEBHOOK_URL",
];

fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze WIFI_SSID, WIFI_PASSWORD und WEBHOOK_URL als Environment-Variablen");
    }

    for name in FORWARDED_VARS {
        println!("cargo:rerun-if-env-changed={}", name);
        if let Ok(value) = std::env::var(name) {
            println!("cargo:rustc-env={}={}", name, value);
        }
    }
    println!("cargo:rerun-if-changed=.env");

    linker_hints();

    // defmt Symbole
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    // Memory-Layout, muss als letztes Skript kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Gibt bei bekannten Linker-Fehlern einen Hinweis aus
///
/// Der Linker ruft dieses Build-Script als `--error-handling-script` mit
/// Fehler-Typ und Symbolname auf.
fn linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, what, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }

        let hint = match what.as_str() {
            s if s.starts_with("_defmt_") => {
                Some("`defmt` not found - is `defmt.x` passed to the linker?")
            }
            "_stack_start" => Some("Is the linker script `linkall.x` missing?"),
            s if s.starts_with("esp_rtos_") => {
                Some("`esp-radio` has no scheduler - initialize `esp-rtos` before the radio.")
            }
            "free" | "malloc" | "calloc" | "get_free_internal_heap_size" | "malloc_internal"
            | "realloc_internal" | "calloc_internal" | "free_internal" => {
                Some("Missing `esp-alloc` dependency or its `compat` feature?")
            }
            _ => None,
        };

        if let Some(hint) = hint {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    match std::env::current_exe() {
        Ok(exe) => println!("cargo:rustc-link-arg=--error-handling-script={}", exe.display()),
        Err(e) => eprintln!("⚠️  Linker-Hinweise deaktiviert: {}", e),
    }
}
