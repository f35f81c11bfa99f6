use serde::Deserialize;

/// One aggregated error bucket from the stats endpoint. Upstream rows are
/// sparse, so every field defaults rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorRecord {
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub count: u64,
}

/// Error classes dropped from every report: handled business exceptions and
/// known noise the operations team does not want resurfaced. The
/// `FIleNotFoundException` spelling is what the upstream agent emits.
pub const EXCLUDED_CLASSES: &[&str] = &[
    "com.tifscore.biz.exception.OneQLoanException",
    "com.tifscore.biz.exception.OneQPinException",
    "com.tifscore.biz.exception.OneQRequiredException",
    "com.tifscore.core.exception.OneQApiException",
    "com.tifscore.core.exception.OneQApprovalException",
    "com.tifscore.core.exception.OneQBizException",
    "com.tifscore.core.exception.OneQDBException",
    "com.tifscore.core.exception.OneQRsltException",
    "com.tifscore.core.exception.OneQLinkTranException",
    "com.tifscore.core.exception.OneQNormalRsltException",
    "com.tifscore.core.exception.OneQOnCoreException",
    "com.tifscore.core.exception.OneQOutBoundException",
    "com.tifscore.core.exception.OneQParamException",
    "com.tifscore.core.exception.OneQPinException",
    "com.tifscore.core.exception.OneQRequiredException",
    "com.tifscore.core.exception.OneQSimulationException",
    "com.tifscore.core.exception.OneQSystemException",
    "com.tifscore.exception.OneQAccountException",
    "com.tifscore.exception.OneQCardException",
    "com.tifscore.exception.OneQChannelException",
    "com.tifscore.exception.OneQCustomerException",
    "com.tifscore.exception.OneQDepositException",
    "com.tifscore.exception.OneQFactoryException",
    "com.tifscore.exception.OneQInvestmentException",
    "java.io.FIleNotFoundException",
    "SLOW_HTTPC",
];

/// Keep records whose class is not in `excluded`, preserving input order.
pub fn apply_exclusions(records: Vec<ErrorRecord>, excluded: &[&str]) -> Vec<ErrorRecord> {
    records
        .into_iter()
        .filter(|record| !excluded.contains(&record.class.as_str()))
        .collect()
}
