//! # Command Shell
//!
//! Line-oriented front end: one command per line, one reply per command.
//!
//! ## Command Reference
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  new                          open a blank product form                │
//! │  quick <idproducto> <nombre>  quick entry for a known product          │
//! │  set <campo> <valor>          edit the open record                     │
//! │  mode caja_total|por_unidad   answer the price-mode question           │
//! │  add                          validate and move into the table         │
//! │  edit <fila> <campo> <valor>  edit a pending row                       │
//! │  remove <fila>                drop a pending row                       │
//! │  show                         header, pending rows and totals          │
//! │  proveedor <id>               supplier for this purchase               │
//! │  factura [nro]                supplier invoice number                  │
//! │  proveedores                  list suppliers from the backend          │
//! │  submit [AAAA-MM-DD]          send the purchase (default: today)       │
//! │  help | quit                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors never end the session: they are printed as `error [CODE] message`
//! and the shell reads the next line.

use std::fmt;
use std::io::Write;

use chrono::{Local, NaiveDate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use compras_client::Proveedor;
use compras_core::{IntakeField, PriceMode};

use crate::commands::form::{self, AddedRow};
use crate::commands::submit::{self, SubmitOutcome};
use crate::commands::table::{self, PendingView};
use crate::commands::{quick, RecordView};
use crate::error::ApiError;
use crate::state::{BackendState, ConfigState, DraftState};

// =============================================================================
// Command Parsing
// =============================================================================

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    Quick { idproducto: i64, nombre: String },
    Set { field: IntakeField, value: String },
    Mode(PriceMode),
    Add,
    Edit { row: usize, field: IntakeField, value: String },
    Remove { row: usize },
    Show,
    Proveedor(i64),
    Factura(String),
    Proveedores,
    Submit { fecha: Option<NaiveDate> },
    Help,
    Quit,
}

impl Command {
    /// Parses a line; blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ApiError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let command = match verb.to_lowercase().as_str() {
            "new" => Command::New,
            "quick" => {
                let (id, nombre) = split_word(rest);
                Command::Quick {
                    idproducto: parse_number(id, "idproducto")?,
                    nombre: nombre.to_string(),
                }
            }
            "set" => {
                let (field, value) = split_word(rest);
                Command::Set {
                    field: parse_field(field)?,
                    value: value.to_string(),
                }
            }
            "mode" => Command::Mode(rest.parse()?),
            "add" => Command::Add,
            "edit" => {
                let (row, rest) = split_word(rest);
                let (field, value) = split_word(rest);
                Command::Edit {
                    row: parse_number(row, "fila")?,
                    field: parse_field(field)?,
                    value: value.to_string(),
                }
            }
            "remove" => Command::Remove {
                row: parse_number(rest, "fila")?,
            },
            "show" => Command::Show,
            "proveedor" => Command::Proveedor(parse_number(rest, "idproveedor")?),
            "factura" => Command::Factura(rest.to_string()),
            "proveedores" => Command::Proveedores,
            "submit" => Command::Submit {
                fecha: parse_fecha(rest)?,
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(ApiError::invalid_input(format!(
                    "Comando desconocido: {other} (escriba help)"
                )))
            }
        };
        Ok(Some(command))
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim()),
        None => (text, ""),
    }
}

fn parse_field(text: &str) -> Result<IntakeField, ApiError> {
    if text.is_empty() {
        return Err(ApiError::invalid_input("Falta el nombre del campo"));
    }
    Ok(text.parse()?)
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T, ApiError> {
    text.trim()
        .parse()
        .map_err(|_| ApiError::invalid_input(format!("Valor inválido para {what}: '{text}'")))
}

fn parse_fecha(text: &str) -> Result<Option<NaiveDate>, ApiError> {
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ApiError::invalid_input(format!("Fecha inválida: '{text}' (use AAAA-MM-DD)")))
}

// =============================================================================
// Replies
// =============================================================================

/// What a successful command prints.
#[derive(Debug, Clone)]
pub enum Reply {
    Record(RecordView),
    Added(AddedRow),
    Pending(PendingView),
    Proveedores(Vec<Proveedor>),
    Submitted(SubmitOutcome),
    Help,
    Bye,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Record(view) => write!(f, "{view}"),
            Reply::Added(added) => writeln!(
                f,
                "  Producto agregado en la fila {} ({} pendientes)",
                added.row, added.totals.item_count
            ),
            Reply::Pending(view) => write!(f, "{view}"),
            Reply::Proveedores(list) if list.is_empty() => writeln!(f, "  (sin proveedores)"),
            Reply::Proveedores(list) => {
                for p in list {
                    writeln!(f, "  {:>6}  {}  {}", p.idproveedor, p.nombre, p.ruc.as_deref().unwrap_or(""))?;
                }
                Ok(())
            }
            Reply::Submitted(SubmitOutcome::Created(created)) => {
                writeln!(f, "  Compra registrada: {}", created.idcompra)?;
                if let Some(message) = &created.message {
                    writeln!(f, "  {message}")?;
                }
                Ok(())
            }
            Reply::Submitted(SubmitOutcome::DryRun(body)) => writeln!(f, "{body}"),
            Reply::Help => f.write_str(HELP),
            Reply::Bye => Ok(()),
        }
    }
}

const HELP: &str = "\
  new                          nuevo producto
  quick <idproducto> <nombre>  carga rápida de un producto existente
  set <campo> <valor>          editar el producto abierto
  mode caja_total|por_unidad   modo de precio de compra (CAJA)
  add                          agregar a la lista de pendientes
  edit <fila> <campo> <valor>  editar una fila pendiente
  remove <fila>                quitar una fila pendiente
  show                         ver la compra
  proveedor <id>               proveedor de la compra
  factura [nro]                número de factura
  proveedores                  listar proveedores
  submit [AAAA-MM-DD]          guardar la compra
  quit                         salir
";

// =============================================================================
// Shell
// =============================================================================

/// Owns the state every command works against.
#[derive(Debug, Clone)]
pub struct Shell {
    draft: DraftState,
    config: ConfigState,
    backend: BackendState,
}

impl Shell {
    pub fn new(draft: DraftState, config: ConfigState, backend: BackendState) -> Self {
        Shell {
            draft,
            config,
            backend,
        }
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    /// Runs one parsed command.
    pub async fn execute(&self, command: Command) -> Result<Reply, ApiError> {
        let reply = match command {
            Command::New => Reply::Record(form::new_product(&self.draft)?),
            Command::Quick { idproducto, nombre } => {
                Reply::Record(quick::quick_entry(&self.draft, idproducto, &nombre)?)
            }
            Command::Set { field, value } => Reply::Record(form::set_field(&self.draft, field, &value)?),
            Command::Mode(mode) => Reply::Record(form::choose_mode(&self.draft, mode)?),
            Command::Add => Reply::Added(form::add_product(&self.draft)?),
            Command::Edit { row, field, value } => {
                Reply::Record(table::edit_row(&self.draft, row, field, &value)?)
            }
            Command::Remove { row } => Reply::Pending(table::remove_row(&self.draft, row)?),
            Command::Show => Reply::Pending(table::show(&self.draft)?),
            Command::Proveedor(id) => Reply::Pending(submit::set_proveedor(&self.draft, id)?),
            Command::Factura(nro) => Reply::Pending(submit::set_factura(&self.draft, &nro)?),
            Command::Proveedores => Reply::Proveedores(submit::list_proveedores(&self.backend).await?),
            Command::Submit { fecha } => {
                let fecha = fecha.unwrap_or_else(|| Local::now().date_naive());
                Reply::Submitted(submit::submit(&self.draft, &self.config, &self.backend, fecha).await?)
            }
            Command::Help => Reply::Help,
            Command::Quit => Reply::Bye,
        };
        Ok(reply)
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R, W>(&self, input: R, mut out: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(out, "error {err}")?;
                    continue;
                }
            };
            debug!(?command, "Executing");

            match self.execute(command).await {
                Ok(Reply::Bye) => break,
                Ok(reply) => write!(out, "{reply}")?,
                Err(err) => writeln!(out, "error {err}")?,
            }
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compras_client::ClientConfig;

    fn shell(dry_run: bool) -> Shell {
        let config = ClientConfig::default();
        let backend = BackendState::new(&config.api).unwrap();
        Shell::new(DraftState::default(), ConfigState::new(dry_run), backend)
    }

    async fn run_script(shell: &Shell, script: &str) -> String {
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  ").unwrap(), None);
        assert_eq!(Command::parse("# comentario").unwrap(), None);
        assert_eq!(
            Command::parse("set nombre_producto Agua 500ml").unwrap(),
            Some(Command::Set {
                field: IntakeField::NombreProducto,
                value: "Agua 500ml".into()
            })
        );
        assert_eq!(
            Command::parse("edit 2 cant_cajas 1,5").unwrap(),
            Some(Command::Edit {
                row: 2,
                field: IntakeField::CantCajas,
                value: "1,5".into()
            })
        );
        assert_eq!(
            Command::parse("MODE caja_total").unwrap(),
            Some(Command::Mode(PriceMode::CajaTotal))
        );
        assert_eq!(
            Command::parse("quick 17 Galletitas de agua").unwrap(),
            Some(Command::Quick {
                idproducto: 17,
                nombre: "Galletitas de agua".into()
            })
        );
        assert_eq!(
            Command::parse("submit 2026-10-19").unwrap(),
            Some(Command::Submit {
                fecha: NaiveDate::from_ymd_opt(2026, 10, 19)
            })
        );
    }

    #[test]
    fn test_set_without_value_clears_field() {
        assert_eq!(
            Command::parse("set cantidad").unwrap(),
            Some(Command::Set {
                field: IntakeField::Cantidad,
                value: String::new()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("vender 3").is_err());
        assert!(Command::parse("set precio 10").is_err());
        assert!(Command::parse("remove uno").is_err());
        assert!(Command::parse("submit 19/10/2026").is_err());
        assert!(Command::parse("mode mitad").is_err());
    }

    #[tokio::test]
    async fn test_box_scenario_through_the_shell() {
        let shell = shell(true);
        let out = run_script(
            &shell,
            "new
             set nombre_producto Agua 500ml
             set unidad_medida CAJA
             mode caja_total
             set cant_p_caja 12
             set precio_compra_caja 12000
             set cantidad 24
             set precio_venta 1500
             set iva 10
             set idcategoria 3
             add
             show
             submit 2026-10-19
             quit
             show",
        )
        .await;

        assert!(out.contains("1000.0000"));
        assert!(out.contains("Producto agregado en la fila 1"));
        assert!(out.contains("\"precio_compra_caja\": 12000.0"));
        assert!(out.contains("\"fecha\": \"2026-10-19\""));
        // Dry run leaves the row pending
        assert_eq!(shell.draft().with_draft(|d| d.len()).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_the_session() {
        let shell = shell(true);
        let out = run_script(
            &shell,
            "bogus
             add
             set unidad_medida DOCENA
             show",
        )
        .await;

        assert!(out.contains("error [INVALID_INPUT] Comando desconocido: bogus"));
        assert!(out.contains("error [VALIDATION_ERROR] Complete los campos obligatorios"));
        assert!(out.contains("error [INVALID_INPUT] Unidad de medida desconocida: DOCENA"));
        assert!(out.contains("(sin productos pendientes)"));
    }

    #[tokio::test]
    async fn test_box_without_units_per_box_blocks_add() {
        let shell = shell(true);
        let out = run_script(
            &shell,
            "set nombre_producto Jugo
             set unidad_medida CAJA
             mode por_unidad
             set cantidad 24
             set precio_compra 100
             set precio_venta 150
             set iva 10
             set idcategoria 1
             add",
        )
        .await;

        assert!(out.contains(
            "error [VALIDATION_ERROR] La cantidad por caja es obligatoria y debe ser mayor a 0"
        ));
        assert!(shell.draft().with_draft(|d| d.is_empty()).unwrap());
    }
}
