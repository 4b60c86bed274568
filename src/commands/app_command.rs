use crate::submission::{FormField, SubmissionForm};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

pub const HELP_TEXT: &str = "可用命令: submit [name=.. category=.. dept=.. condition=.. weight=.. qty=.. desc=..] | form reset | qr search <text> | qr clear | qr url <code> | qr save <code> | refresh | demo seed | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// 命令行给出的字段覆盖到当前表单后提交
    Submit {
        fields: Vec<(FormField, String)>,
    },
    /// 发往后台的完整表单
    SubmitForm(SubmissionForm),
    FormReset,
    QrSearch(String),
    QrClear,
    QrUrl {
        code: String,
    },
    QrSave {
        code: String,
    },
    Refresh,
    DemoSeed,
    Help,
    Quit,
    Unknown(String),
}

fn pair_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z_]+)=(?:"([^"]*)"|'([^']*)'|(\S+))"#).ok())
        .as_ref()
}

/// 解析 `key=value` 序列，值可以用单/双引号包住
fn parse_pairs(args: &str) -> Result<Vec<(FormField, String)>, String> {
    let re = pair_regex().ok_or_else(|| "内部错误: 参数解析器不可用".to_string())?;
    let mut fields = Vec::new();
    let mut last = 0usize;
    for caps in re.captures_iter(args) {
        let Some(whole) = caps.get(0) else { continue };
        let gap = args[last..whole.start()].trim();
        if !gap.is_empty() {
            return Err(format!("无法解析参数: {}", gap));
        }
        last = whole.end();

        let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let field = FormField::from_str(key).map_err(|_| format!("未知字段: {}", key))?;
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        fields.push((field, value));
    }
    let tail = args[last..].trim();
    if !tail.is_empty() {
        return Err(format!("无法解析参数: {}", tail));
    }
    Ok(fields)
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "submit" => {
                let rest = s["submit".len()..].trim();
                match parse_pairs(rest) {
                    Ok(fields) => Ok(AppCommand::Submit { fields }),
                    Err(msg) => Ok(AppCommand::Unknown(msg)),
                }
            }
            "form" => match parts.get(1).copied() {
                Some("reset") | Some("clear") => Ok(AppCommand::FormReset),
                _ => Ok(AppCommand::Unknown("用法: form reset".to_string())),
            },
            "qr" => match parts.get(1).copied() {
                Some("search") => {
                    // 保留原始空格
                    let query = s
                        .splitn(3, char::is_whitespace)
                        .nth(2)
                        .map(str::trim)
                        .unwrap_or("");
                    if query.is_empty() {
                        Ok(AppCommand::QrClear)
                    } else {
                        Ok(AppCommand::QrSearch(query.to_string()))
                    }
                }
                Some("clear") => Ok(AppCommand::QrClear),
                Some("url") => match parts.get(2) {
                    Some(code) => Ok(AppCommand::QrUrl {
                        code: code.to_string(),
                    }),
                    None => Ok(AppCommand::Unknown("用法: qr url <code>".to_string())),
                },
                Some("save") => match parts.get(2) {
                    Some(code) => Ok(AppCommand::QrSave {
                        code: code.to_string(),
                    }),
                    None => Ok(AppCommand::Unknown("用法: qr save <code>".to_string())),
                },
                _ => Ok(AppCommand::Unknown(
                    "用法: qr search <text> | qr clear | qr url <code> | qr save <code>".to_string(),
                )),
            },
            "refresh" | "r" => Ok(AppCommand::Refresh),
            "demo" => {
                if parts.get(1) == Some(&"seed") {
                    Ok(AppCommand::DemoSeed)
                } else {
                    Ok(AppCommand::Unknown("用法: demo seed".to_string()))
                }
            }
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("未知命令: {}", parts[0]))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppCommand {
        s.parse().unwrap()
    }

    #[test]
    fn submit_with_quoted_values() {
        let cmd = parse(r#"submit name="Dell Latitude 5490" category='Computers & Laptops' dept=IT qty=2 weight=1.8"#);
        assert_eq!(
            cmd,
            AppCommand::Submit {
                fields: vec![
                    (FormField::ItemName, "Dell Latitude 5490".to_string()),
                    (FormField::Category, "Computers & Laptops".to_string()),
                    (FormField::Department, "IT".to_string()),
                    (FormField::Quantity, "2".to_string()),
                    (FormField::Weight, "1.8".to_string()),
                ]
            }
        );
    }

    #[test]
    fn bare_submit_uses_current_form() {
        assert_eq!(parse("submit"), AppCommand::Submit { fields: vec![] });
        assert_eq!(
            parse("submit desc=\"\""),
            AppCommand::Submit {
                fields: vec![(FormField::Description, String::new())]
            }
        );
    }

    #[test]
    fn submit_rejects_stray_tokens_and_unknown_keys() {
        assert_eq!(
            parse("submit name=phone oops"),
            AppCommand::Unknown("无法解析参数: oops".to_string())
        );
        assert_eq!(
            parse("submit colour=red"),
            AppCommand::Unknown("未知字段: colour".to_string())
        );
    }

    #[test]
    fn qr_subcommands() {
        assert_eq!(
            parse("qr search  iPhone 12 "),
            AppCommand::QrSearch("iPhone 12".to_string())
        );
        assert_eq!(parse("qr search"), AppCommand::QrClear);
        assert_eq!(parse("qr clear"), AppCommand::QrClear);
        assert_eq!(
            parse("qr url ewaste_1_2"),
            AppCommand::QrUrl {
                code: "ewaste_1_2".to_string()
            }
        );
        assert_eq!(
            parse("qr save ewaste_1_2"),
            AppCommand::QrSave {
                code: "ewaste_1_2".to_string()
            }
        );
        assert!(matches!(parse("qr save"), AppCommand::Unknown(_)));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("form reset"), AppCommand::FormReset);
        assert_eq!(parse("refresh"), AppCommand::Refresh);
        assert_eq!(parse("demo seed"), AppCommand::DemoSeed);
        assert_eq!(parse("help"), AppCommand::Help);
        assert_eq!(parse("exit"), AppCommand::Quit);
        assert_eq!(parse("fly"), AppCommand::Unknown("未知命令: fly".to_string()));
    }
}
