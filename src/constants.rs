// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const URL_TRUNCATE_LENGTH: usize = 60;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const TOKEN_ENV_VAR: &str = "REDGIFS_TOKEN";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// CDN 子域名代际替换表，按顺序依次应用 (thumbs2 最终会变成 thumbs4)。
/// 平台升级 CDN 代际时，只需在末尾追加一行。
pub const CDN_SUBDOMAIN_REWRITES: &[(&str, &str)] = &[("thumbs2", "thumbs3"), ("thumbs3", "thumbs4")];

pub const HELP_TOKEN_GUIDE: &str = r#"
1. 打开网站: 使用 Chrome / Edge / Firefox 浏览器访问 https://www.redgifs.com/
2. 打开开发者工具:
   - 在 Windows / Linux 上: 按 F12 或 Ctrl+Shift+I
   - 在 macOS 上: 按 Cmd+Opt+I (⌘⌥I)
3. 切换到“网络” (Network) 标签页，然后刷新页面。
4. 在请求列表中找到任意一个发往 api.redgifs.com 的请求，
   复制请求头 Authorization 中 "Bearer " 之后的全部内容。
5. 通过以下任一方式提供 Token:
   - 命令行参数: --token <TOKEN>
   - 环境变量: REDGIFS_TOKEN=<TOKEN>
   - 配置文件 ~/.redgifs-dl/config.json 中的 "accesstoken" 字段"#;

pub mod api {
    pub const GIF_TEMPLATE: &str = "https://api.redgifs.com/v2/gifs/{id}";
    pub const GALLERY_TEMPLATE: &str = "https://api.redgifs.com/v2/gallery/{gallery_id}";
    pub const REFERER: &str = "https://www.redgifs.com/";
    pub const ORIGIN: &str = "https://www.redgifs.com";

    pub mod media_types {
        pub const VIDEO: i64 = 1;
        pub const IMAGE: i64 = 2;
    }
}
