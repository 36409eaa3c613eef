//! Resolução de caminhos
//!
//! Um caminho absoluto tem a forma `/<dispositivo>/<resto>`. Só o primeiro
//! segmento é interpretado; o resto pertence ao dispositivo.
//!
//! Atalho da raiz: `/arquivo.ext` (sem segundo '/') vai para o dispositivo
//! chamado literalmente `/`, com resto `arquivo.ext`.

use super::error::PathError;
use super::registry::DeviceRegistry;
use crate::config::{MAX_DEV_NAME, ROOT_DEV_NAME};

/// Caminho dividido em nome do dispositivo e resto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSpec<'a> {
    /// Nome candidato (ou `/` no atalho da raiz)
    pub device: &'a str,
    /// Caminho local ao dispositivo
    pub remainder: &'a str,
}

impl<'a> PathSpec<'a> {
    /// Divide um caminho de arquivo.
    ///
    /// Não verifica o resto: ele só é rejeitado depois do casamento com o
    /// registro, para que `/nada/` reporte primeiro o dispositivo ausente.
    pub fn parse(path: &'a str) -> Result<Self, PathError> {
        let rest = strip_root(path)?;

        match rest.find('/') {
            None => Ok(Self {
                device: ROOT_DEV_NAME,
                remainder: rest,
            }),
            Some(end) => {
                let device = &rest[..end];
                check_segment(device)?;
                Ok(Self {
                    device,
                    remainder: &rest[end + 1..],
                })
            }
        }
    }

    /// Divide um caminho de diretório.
    ///
    /// O primeiro segmento é sempre o dispositivo e o resto pode ser vazio:
    /// `/sd` e `/sd/` abrem a raiz de `sd`. Só `/` abre a raiz do dispositivo `/`.
    pub fn parse_dir(path: &'a str) -> Result<Self, PathError> {
        let rest = strip_root(path)?;
        if rest.is_empty() {
            return Ok(Self {
                device: ROOT_DEV_NAME,
                remainder: "",
            });
        }

        let (device, remainder) = match rest.find('/') {
            Some(end) => (&rest[..end], &rest[end + 1..]),
            None => (rest, ""),
        };
        check_segment(device)?;
        Ok(Self { device, remainder })
    }
}

/// Caminho resolvido para um slot do registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub index: usize,
    pub remainder: &'a str,
}

/// Resolve um caminho de arquivo: dispositivo + resto não-vazio
pub fn resolve<'a>(registry: &DeviceRegistry, path: &'a str) -> Result<Resolved<'a>, PathError> {
    let spec = PathSpec::parse(path)?;
    let index = lookup(registry, spec.device)?;

    if spec.remainder.is_empty() {
        return Err(PathError::EmptyRemainder);
    }

    Ok(Resolved {
        index,
        remainder: spec.remainder,
    })
}

/// Resolve um caminho de diretório: só o dispositivo precisa existir
pub fn resolve_dir<'a>(
    registry: &DeviceRegistry,
    path: &'a str,
) -> Result<Resolved<'a>, PathError> {
    let spec = PathSpec::parse_dir(path)?;
    let index = lookup(registry, spec.device)?;

    Ok(Resolved {
        index,
        remainder: spec.remainder,
    })
}

fn strip_root(path: &str) -> Result<&str, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    path.strip_prefix('/').ok_or(PathError::NotAbsolute)
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptyDeviceName);
    }
    if segment.len() > MAX_DEV_NAME {
        return Err(PathError::NameTooLong);
    }
    Ok(())
}

fn lookup(registry: &DeviceRegistry, name: &str) -> Result<usize, PathError> {
    // Primeiro que casar vence (ordem de índice)
    registry.find(name).ok_or(PathError::NoDevice)
}
