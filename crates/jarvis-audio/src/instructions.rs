//! Platform-specific guidance for enabling voice input.

/// Human-readable steps to get a capture backend working on `os`
/// (a `std::env::consts::OS` value).
pub fn install_instructions(os: &str) -> String {
    let mut lines: Vec<&str> = vec![
        "No speech capture backend found. Voice input needs an external recogniser:",
        "a program that records from the microphone and prints the transcript on stdout.",
        "",
        "Recommended: whisper.cpp (offline, runs on CPU).",
        "",
    ];

    match os {
        "macos" => lines.extend([
            "macOS (Homebrew):",
            "  brew install whisper-cpp sox",
            "  # speech output uses the built-in `say` command",
        ]),
        "linux" => lines.extend([
            "Debian/Ubuntu:",
            "  sudo apt update && sudo apt install sox espeak build-essential cmake",
            "  git clone https://github.com/ggerganov/whisper.cpp && make -C whisper.cpp",
        ]),
        "windows" => lines.extend([
            "Windows:",
            "  # download a whisper.cpp release build and add it to PATH",
            "  winget install sox",
            "  # speech output falls back to printing responses",
        ]),
        _ => lines.extend([
            "Generic instructions:",
            "  build whisper.cpp from source and install sox for microphone recording",
            "  # if that fails, install the system audio library (portaudio/libsndfile) first",
        ]),
    }

    lines.extend([
        "",
        "Then point the assistant at your recogniser in ~/.jarvis/config.toml:",
        "  [voice]",
        "  capture_command = \"jarvis-listen\"   # your wrapper script",
        "  capture_args = []",
        "",
        "Restart the assistant; it checks for the recogniser once at startup.",
    ]);

    lines.join("\n")
}
