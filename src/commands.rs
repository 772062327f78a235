//! Handlers behind the CLI subcommands.

use crate::accounts::{
    logins_by_day_csv, users_csv, AccountError, AccountService, AccountStore, HookDispatcher,
    TracingSyncHook, UsageStats,
};
use crate::cli::{AdminArgs, AdminCommand};
use crate::config::{AdminSettings, AppConfig};
use crate::engine::{
    parse_input, ChatCommand, ConversationController, IncrementalRenderer, Presenter,
    SessionStore, Task, CURSOR,
};
use crate::llm::OpenAiClient;
use crate::preprocessing::{Cleaner, CleanerError};
use crate::prompt;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

/* ---------- PRESENTER ---------- */

/// Streams snapshots to a terminal, printing only the newly revealed text.
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    shown: String,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn echo_user(&mut self, _text: &str) {
        // Already on screen as typed.
        self.shown.clear();
    }

    fn show_partial(&mut self, snapshot: &str) {
        let visible = snapshot.strip_suffix(CURSOR).unwrap_or(snapshot);
        let fresh = match visible.strip_prefix(self.shown.as_str()) {
            Some(fresh) => fresh.to_string(),
            None => visible.to_string(),
        };
        self.write(&fresh);
        self.shown = visible.to_string();
    }

    fn show_final(&mut self, text: &str) {
        if self.shown.is_empty() {
            self.write(text);
        }
        self.write("\n");
        self.shown.clear();
    }

    fn show_error(&mut self, message: &str) {
        self.write(&format!("{message}\n\n"));
    }
}

/* ---------- CHAT ---------- */

type StdinLines = Lines<BufReader<Stdin>>;

async fn ask(lines: &mut StdinLines, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

fn account_service(config: &AppConfig) -> AccountService {
    let hooks = HookDispatcher::spawn(vec![Box::new(TracingSyncHook)]);
    AccountService::new(AccountStore::new(&config.storage.path), config.admin.clone())
        .with_hooks(hooks)
}

/// Prompts until a login succeeds. `None` when input ends first.
/// Input is read line by line from stdin, so the password is echoed.
async fn login_prompt(accounts: &AccountService, lines: &mut StdinLines) -> Result<Option<String>> {
    println!("🔒 Acesso ao Assistente de Excel - Exclusivo para Alunos da Coeso Cursos");
    loop {
        let Some(email) = ask(lines, "Digite seu e-mail: ").await? else {
            return Ok(None);
        };
        let Some(password) = ask(lines, "Digite sua senha: ").await? else {
            return Ok(None);
        };

        match accounts.login(email.trim(), &password) {
            Ok(user) => return Ok(Some(user.email)),
            Err(AccountError::InvalidEmail | AccountError::EmptyPassword) => {
                println!("Por favor, preencha e-mail e senha válidos.")
            }
            Err(AccountError::InvalidCredentials) => println!("E-mail ou senha incorretos."),
            Err(e) => return Err(e).context("Falha ao consultar o cadastro"),
        }
    }
}

pub async fn chat(config: &AppConfig) -> Result<()> {
    config
        .validate_for_chat()
        .context("API Key não configurada")?;

    let system_prompt = prompt::load(config.conversation.system_prompt_path.as_deref())
        .context("Failed to load the system prompt")?;
    let client = OpenAiClient::from_settings(&config.openai)?;
    let controller = ConversationController::new(Arc::new(client))
        .with_options(config.completion_options())
        .with_max_turns(config.conversation.max_turns)
        .with_renderer(IncrementalRenderer::new(config.paragraph_delay()));
    let cleaner = Cleaner::new(config.conversation.max_input_length);

    let accounts = account_service(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(email) = login_prompt(&accounts, &mut lines).await? else {
        return Ok(());
    };

    let sessions = SessionStore::new();
    let id = sessions.open(&email, &system_prompt).await;
    let session = sessions
        .get(id)
        .await
        .context("Session vanished right after opening")?;
    let mut presenter = TerminalPresenter::new(io::stdout());

    println!();
    println!("🏗️ Assistente de Excel para Construção Civil");
    println!("Obtenha fórmulas prontas para usar em suas planilhas de obra");
    println!("Comandos: /limpar (limpar conversa), /sair (encerrar)");

    loop {
        let Some(line) = ask(&mut lines, "\n> ").await? else {
            break;
        };

        match parse_input(&line) {
            Task::Command(ChatCommand::Reset) => {
                session.lock().await.reset();
                println!("Conversa limpa.");
            }
            Task::Command(ChatCommand::Logout) => break,
            Task::Command(ChatCommand::Unknown(command)) => {
                println!("Comando desconhecido: /{command}");
            }
            Task::Chat(text) => {
                let question = match cleaner.clean(&text) {
                    Ok(question) => question,
                    Err(CleanerError::EmptyInput) => continue,
                    Err(e @ CleanerError::TooLong { .. }) => {
                        warn!(error = %e, "Submission rejected");
                        println!("Pergunta muito longa. Resuma e tente novamente.");
                        continue;
                    }
                };

                println!();
                let mut session = session.lock().await;
                controller
                    .submit(&mut session, &question, &mut presenter)
                    .await?;
            }
        }
    }

    sessions.close(id).await;
    accounts.logout(&email)?;
    println!("Até logo!");
    Ok(())
}

/* ---------- ADMIN ---------- */

pub fn admin(config: &AppConfig, args: AdminArgs) -> Result<()> {
    config.validate_for_admin()?;
    let accounts = account_service(config);
    let (email, password) = admin_credentials(&args, &config.admin);
    accounts
        .admin_login(email, password)
        .context("Acesso negado")?;

    let mut out = io::stdout().lock();
    match args.command {
        AdminCommand::Register { email, password } => {
            accounts.register(&email, &password)?;
            writeln!(out, "✅ Usuário cadastrado com sucesso.")?;
        }
        AdminCommand::Users => {
            let users = accounts.users()?;
            if users.is_empty() {
                writeln!(out, "Nenhum usuário cadastrado.")?;
            }
            for user in users {
                writeln!(
                    out,
                    "{:<40} {:<20} {}",
                    user.email,
                    user.created_at.format("%Y-%m-%d %H:%M:%S"),
                    user.last_login.format("%Y-%m-%d %H:%M:%S")
                )?;
            }
        }
        AdminCommand::Remove { email } => {
            if accounts.remove(&email)? {
                writeln!(out, "Usuário {email} removido com sucesso.")?;
            } else {
                writeln!(out, "Nenhum usuário com o e-mail {email}.")?;
            }
        }
        AdminCommand::Logs => {
            let logs = accounts.logs()?;
            if logs.is_empty() {
                writeln!(out, "Nenhum log registrado até agora.")?;
            }
            for entry in logs {
                writeln!(
                    out,
                    "{:>5} {} {:<14} {}",
                    entry.id,
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.action,
                    entry.email
                )?;
            }
        }
        AdminCommand::Stats => {
            let stats = UsageStats::compute(&accounts.logs()?, &accounts.users()?, Utc::now());
            writeln!(out, "Total de Usuários: {}", stats.total_users)?;
            writeln!(out, "Total de Logins: {}", stats.total_logins)?;
            writeln!(out, "Logins últimos 7 dias: {}", stats.logins_last_7_days)?;

            writeln!(out, "\nLogins por Dia:")?;
            for day in &stats.logins_by_day {
                writeln!(out, "  {} {}", day.day, day.total)?;
            }
            writeln!(out, "\nÚltimos Cadastros:")?;
            for recent in &stats.last_registered {
                writeln!(out, "  {:<40} {}", recent.email, recent.at.format("%Y-%m-%d %H:%M:%S"))?;
            }
            writeln!(out, "\nÚltimos Acessos:")?;
            for recent in &stats.last_logins {
                writeln!(out, "  {:<40} {}", recent.email, recent.at.format("%Y-%m-%d %H:%M:%S"))?;
            }
        }
        AdminCommand::Schema => {
            writeln!(out, "{:<4} {:<14} {:<10} {:<8} pk", "cid", "name", "type", "notnull")?;
            for column in accounts.user_schema() {
                writeln!(
                    out,
                    "{:<4} {:<14} {:<10} {:<8} {}",
                    column.cid,
                    column.name,
                    column.kind,
                    u8::from(column.not_null),
                    u8::from(column.primary_key)
                )?;
            }
        }
        AdminCommand::ExportUsers { out: path } => {
            let csv = users_csv(&accounts.users()?);
            export(&mut out, path, &csv)?;
        }
        AdminCommand::ExportLogins { out: path } => {
            let stats = UsageStats::compute(&accounts.logs()?, &accounts.users()?, Utc::now());
            export(&mut out, path, &logins_by_day_csv(&stats.logins_by_day))?;
        }
    }

    Ok(())
}

/// Flags win; otherwise the configured administrator is used.
fn admin_credentials<'a>(args: &'a AdminArgs, configured: &'a AdminSettings) -> (&'a str, &'a str) {
    (
        args.email.as_deref().unwrap_or(&configured.email),
        args.password.as_deref().unwrap_or(&configured.password),
    )
}

fn export(out: &mut impl Write, path: Option<PathBuf>, csv: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(&path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = csv.len(), "CSV exported");
        }
        None => out.write_all(csv.as_bytes())?,
    }
    Ok(())
}
