//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use majordomo_application::{HandleTurnInput, HandleTurnUseCase};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: HandleTurnUseCase,
    assistant_name: String,
    show_data: bool,
    history_file: Option<PathBuf>,
    session: Option<String>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: HandleTurnUseCase) -> Self {
        Self {
            use_case,
            assistant_name: "Majordomo".to_string(),
            show_data: false,
            history_file: None,
            session: None,
        }
    }

    /// Set the assistant name shown in the banner
    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    /// Set whether structured data is printed with replies
    pub fn with_show_data(mut self, show: bool) -> Self {
        self.show_data = show;
        self
    }

    /// Override the readline history file location
    pub fn with_history_file(mut self, path: PathBuf) -> Self {
        self.history_file = Some(path);
        self
    }

    /// Resume an existing session instead of starting fresh
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session = Some(session_id.into());
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = self
            .history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("majordomo").join("history.txt")));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        // The session id and data toggle live for the whole loop and can
        // change mid-conversation via /new and /data.
        let mut session = self.session.clone();
        let mut show_data = self.show_data;

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(line, &mut session, &mut show_data) {
                            break;
                        }
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(line);

                    // Run the turn
                    self.process_turn(line, &mut session, show_data).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│{:^45}│", format!("{} - Chat Mode", self.assistant_name));
        println!("╰─────────────────────────────────────────────╯");
        println!();
        if let Some(ref id) = self.session {
            println!("Resuming session: {}", id);
            println!();
        }
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /session  - Show the current session id");
        println!("  /new      - Start a fresh session");
        println!("  /data     - Toggle structured data display");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(
        &self,
        cmd: &str,
        session: &mut Option<String>,
        show_data: &mut bool,
    ) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /session         - Show the current session id");
                println!("  /new             - Start a fresh session");
                println!("  /data            - Toggle structured data display");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/session" => {
                match session {
                    Some(id) => println!("Current session: {}", id),
                    None => println!("No session yet - say something first."),
                }
                false
            }
            "/new" => {
                *session = None;
                println!("Started a fresh session.");
                false
            }
            "/data" => {
                *show_data = !*show_data;
                println!(
                    "Structured data display: {}",
                    if *show_data { "on" } else { "off" }
                );
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_turn(&self, question: &str, session: &mut Option<String>, show_data: bool) {
        println!();

        let mut input = HandleTurnInput::new(question);
        if let Some(ref id) = *session {
            input = input.with_session(id.clone());
        }

        match self.use_case.execute(input).await {
            Ok(reply) => {
                *session = Some(reply.session_id.clone());
                print!("{}", ConsoleFormatter::format_reply(&reply, show_data));
            }
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::format_error(&e.to_string()));
            }
        }
        println!();
    }
}
