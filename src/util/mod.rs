/// 共用的 HTTP 請求工具
pub mod http;
/// 文字與數值解析工具
pub mod text;
