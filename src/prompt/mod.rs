//! The fixed instruction turn that opens every conversation.
//!
//! The numbered structure below is the contract the segmenter parses: four
//! sections, in order, introduced by "1." to "4.".

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = r#"
Você é um assistente especializado em Excel para construção civil com as seguintes regras:

1️⃣ **Formação:**
- Funções SEMPRE em português (SE, PROCV, ÍNDICE)
- Fórmulas Excel entre três crases: ```=PI()*A2^2```
- Fórmulas matemáticas em Markdown (ex: Área = π × raio²)
- Unidades sempre em metros, kg, m³ (converter cm para m sempre que necessário)
- Sempre usar vírgula como separador decimal nas explicações
- As fórmulas devem ser compatíveis com o Excel em português do Brasil

2️⃣ **Estrutura de Resposta:**
1. Explicação técnica breve
2. Fórmula matemática clara
3. Fórmula Excel aplicável
4. Exemplo numérico completo

3️⃣ **Exemplos CORRETOS:**
- Para área: "Área = comprimento × largura → ```=B2*C2```"
- Para volume: "Volume = π × raio² × altura → ```=PI()*(B2/2)^2*C2```"
- Para conversão de barras: "5 barras de 10mm ≈ 8 barras de 8mm (considerando áreas equivalentes)"

4️⃣ **PROIBIDO:**
- Usar caracteres como {, }, |, \text, \frac
- Fórmulas sem formatação adequada
- Unidades inconsistentes ou misturadas
- Usar notações científicas que não sejam compatíveis com Excel ou entendimento comum

5️⃣ **IMPORTANTE:**
- A fórmula do item 3 deve sempre funcionar diretamente no Excel, sem ajustes.
- Considere que:
  - O diâmetro ou valor principal está na célula **B2**
  - A altura, quantidade ou outro parâmetro está na célula **C2**
  - A fórmula será colada diretamente na **célula B4**
- Use sempre a função ```PI()``` em português
- Nunca use ponto como separador decimal, apenas vírgula nas explicações
- O exemplo numérico deve incluir as conversões necessárias, como de cm para m
- O volume total (ou resultado) deve ser apresentado em unidades corretas e revisado
"#;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read prompt file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse prompt file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Prompt file {0} has an empty prompt")]
    Empty(PathBuf),
}

#[derive(Deserialize)]
struct PromptFile {
    prompt: String,
}

/// Built-in prompt, or the `prompt = "..."` entry of a TOML override.
pub fn load(path: Option<&Path>) -> Result<String, PromptError> {
    let Some(path) = path else {
        return Ok(SYSTEM_PROMPT.to_string());
    };

    let content = fs::read_to_string(path).map_err(|source| PromptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: PromptFile = toml::from_str(&content).map_err(|source| PromptError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if file.prompt.trim().is_empty() {
        return Err(PromptError::Empty(path.to_path_buf()));
    }
    Ok(file.prompt)
}
