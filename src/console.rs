// =============================================================================
// CONSOLE - HOOKS DE ENVIO/RECEPÇÃO
// =============================================================================
//
// Ponte entre o Devman e o driver de console da plataforma (normalmente uma
// UART). O Devman não programa hardware: a plataforma instala duas funções
// durante o boot e tudo que precisa de console passa por aqui.
//
// CONSUMIDORES:
// - Macros de log (kinfo!, kwarn!, ...) via emit_*
// - Dispositivo `std` (stdin/stdout/stderr)
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_nl()        : Envia newline (\r\n)
//
// Sem hook instalado, a saída é descartada e a leitura retorna None.
//
// =============================================================================

use spin::RwLock;

/// Envia um byte para o console
pub type SendFn = fn(u8);

/// Recebe um byte do console (bloqueante na plataforma; None se indisponível)
pub type RecvFn = fn() -> Option<u8>;

static SEND: RwLock<Option<SendFn>> = RwLock::new(None);
static RECV: RwLock<Option<RecvFn>> = RwLock::new(None);

// =============================================================================
// INSTALAÇÃO DOS HOOKS
// =============================================================================

/// Instala (ou remove, com `None`) a função de envio
pub fn set_send(func: Option<SendFn>) {
    *SEND.write() = func;
}

/// Instala (ou remove, com `None`) a função de recepção
pub fn set_recv(func: Option<RecvFn>) {
    *RECV.write() = func;
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte para o console.
///
/// Todas as outras funções de escrita usam esta internamente.
#[inline]
pub fn emit(byte: u8) {
    // Copiar o ponteiro e soltar o lock antes de chamar a plataforma
    let send = *SEND.read();
    if let Some(send) = send {
        send(byte);
    }
}

/// Envia uma string para o console.
pub fn emit_str(s: &str) {
    for &byte in s.as_bytes() {
        emit(byte);
    }
}

/// Envia uma nova linha (CRLF).
pub fn emit_nl() {
    emit(b'\r');
    emit(b'\n');
}

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
pub fn emit_hex(value: u64) {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    emit(b'0');
    emit(b'x');
    for shift in (0..16).rev() {
        let nibble = ((value >> (shift * 4)) & 0xF) as usize;
        emit(DIGITS[nibble]);
    }
}

// =============================================================================
// LEITURA
// =============================================================================

/// Recebe um byte do console, se houver hook instalado.
pub fn recv() -> Option<u8> {
    let recv = *RECV.read();
    recv.and_then(|func| func())
}

// =============================================================================
// CAPTURA (TESTES NO HOST)
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_hex_and_newline() {
        let cap = capture::install();
        emit_hex(0x2A);
        emit_nl();
        assert_eq!(cap.take_output(), b"0x000000000000002A\r\n");
    }

    #[test]
    fn test_recv_drains_queue() {
        let cap = capture::install();
        cap.feed(b"k");
        assert_eq!(recv(), Some(b'k'));
        assert_eq!(recv(), None);
    }
}
