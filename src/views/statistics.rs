use serde::Serialize;

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Users {
    pub total: u64,
    pub ativos: u64,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Orders {
    pub total: u64,
    pub pagos: u64,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Trials {
    pub pendentes: u64,
}

#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Revenue {
    pub total: f64,
}

/// Dashboard counters for admins
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Statistics {
    pub usuarios: Users,
    pub pedidos: Orders,
    pub solicitacoes_teste: Trials,
    pub receita: Revenue,
}
