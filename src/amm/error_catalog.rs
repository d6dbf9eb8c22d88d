//! Catálogo imutável de erros do AMM.
use core::fmt;

/// Código de erro do AMM.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum AmmErrorCode {
    /// Operações com montante zero.
    ZeroAmount,
    /// Limite superior da largura fixa excedido.
    ArithmeticOverflow,
    /// Subtração abaixo de zero.
    ArithmeticUnderflow,
    /// Divisor zero (antes de olhar qualquer witness).
    DivisionByZero,
    /// Valor fornecido fora do circuito reprovado na verificação algébrica.
    InvalidWitness,
    /// Par com duas cores iguais.
    IdenticalTokens,
    PairAlreadyExists,
    PairNotFound,
    /// Coin não cobre o valor pedido.
    InsufficientValue,
    InsufficientLiquidity,
    InsufficientInputAmount,
    InsufficientOutputAmount,
    /// Limite de slippage do chamador violado.
    SlippageExceeded,
    /// Coin com cor diferente da esperada.
    ColorMismatch,
    InvalidFee,
    InvalidConfig,
    /// Invariante interno (k) violado: defeito, nunca esperado.
    InvariantViolation,
}

impl AmmErrorCode {
    /// Código textual estável do erro.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "AMM-0001",
            Self::ArithmeticOverflow => "AMM-0002",
            Self::ArithmeticUnderflow => "AMM-0003",
            Self::DivisionByZero => "AMM-0004",
            Self::InvalidWitness => "AMM-0005",
            Self::IdenticalTokens => "AMM-0006",
            Self::PairAlreadyExists => "AMM-0007",
            Self::PairNotFound => "AMM-0008",
            Self::InsufficientValue => "AMM-0009",
            Self::InsufficientLiquidity => "AMM-0010",
            Self::InsufficientInputAmount => "AMM-0011",
            Self::InsufficientOutputAmount => "AMM-0012",
            Self::SlippageExceeded => "AMM-0013",
            Self::ColorMismatch => "AMM-0014",
            Self::InvalidFee => "AMM-0015",
            Self::InvalidConfig => "AMM-0016",
            Self::InvariantViolation => "AMM-0017",
        }
    }

    /// Título curto em português.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "Quantidade zerada",
            Self::ArithmeticOverflow => "Overflow aritmético",
            Self::ArithmeticUnderflow => "Underflow aritmético",
            Self::DivisionByZero => "Divisão por zero",
            Self::InvalidWitness => "Witness inválido",
            Self::IdenticalTokens => "Tokens idênticos",
            Self::PairAlreadyExists => "Par já existe",
            Self::PairNotFound => "Par não encontrado",
            Self::InsufficientValue => "Valor insuficiente",
            Self::InsufficientLiquidity => "Liquidez insuficiente",
            Self::InsufficientInputAmount => "Input insuficiente",
            Self::InsufficientOutputAmount => "Output insuficiente",
            Self::SlippageExceeded => "Slippage excedido",
            Self::ColorMismatch => "Cor divergente",
            Self::InvalidFee => "Taxa inválida",
            Self::InvalidConfig => "Configuração inválida",
            Self::InvariantViolation => "Invariante violado",
        }
    }

    /// Mensagem base em português. Placeholders `{chave}` vêm do contexto.
    pub const fn message_pt(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "amount deve ser > 0",
            Self::ArithmeticOverflow => "overflow em {op} ({width})",
            Self::ArithmeticUnderflow => "underflow em {op} ({width})",
            Self::DivisionByZero => "divisor deve ser > 0",
            Self::InvalidWitness => "witness de {kind} reprovado na verificação",
            Self::IdenticalTokens => "tokenA e tokenB devem ter cores distintas",
            Self::PairAlreadyExists => "par {pair} já existe",
            Self::PairNotFound => "par {pair} não existe",
            Self::InsufficientValue => "coin tem {available}, pedido {requested}",
            Self::InsufficientLiquidity => "liquidez insuficiente para a operação",
            Self::InsufficientInputAmount => "amountIn deve ser > 0",
            Self::InsufficientOutputAmount => "amountOut abaixo do mínimo ou acima da reserva",
            Self::SlippageExceeded => "preço executado fora do limite do chamador",
            Self::ColorMismatch => "cor do coin não corresponde à esperada",
            Self::InvalidFee => "taxa deve satisfazer 0 < numerador <= denominador",
            Self::InvalidConfig => "valor inválido para {key}",
            Self::InvariantViolation => "invariante k violado após swap",
        }
    }

    /// Retorna todas as variantes em ordem estável.
    pub fn all() -> &'static [AmmErrorCode] {
        const ALL: &[AmmErrorCode] = &[
            AmmErrorCode::ZeroAmount,
            AmmErrorCode::ArithmeticOverflow,
            AmmErrorCode::ArithmeticUnderflow,
            AmmErrorCode::DivisionByZero,
            AmmErrorCode::InvalidWitness,
            AmmErrorCode::IdenticalTokens,
            AmmErrorCode::PairAlreadyExists,
            AmmErrorCode::PairNotFound,
            AmmErrorCode::InsufficientValue,
            AmmErrorCode::InsufficientLiquidity,
            AmmErrorCode::InsufficientInputAmount,
            AmmErrorCode::InsufficientOutputAmount,
            AmmErrorCode::SlippageExceeded,
            AmmErrorCode::ColorMismatch,
            AmmErrorCode::InvalidFee,
            AmmErrorCode::InvalidConfig,
            AmmErrorCode::InvariantViolation,
        ];
        ALL
    }

    /// Erros de guarda econômica: o chamador pode reenviar com outros limites.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ZeroAmount
                | Self::InsufficientValue
                | Self::InsufficientLiquidity
                | Self::InsufficientInputAmount
                | Self::InsufficientOutputAmount
                | Self::SlippageExceeded
        )
    }
}

impl fmt::Display for AmmErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mensagem padrão na localidade ativa (pt-BR).
pub fn default_locale_message(code: AmmErrorCode) -> &'static str {
    code.message_pt()
}
