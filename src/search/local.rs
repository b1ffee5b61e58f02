use crate::{declare::SearchResult, search::MAX_RESULTS};

struct LocalStock {
    symbol: &'static str,
    name: &'static str,
    exchange: &'static str,
}

macro_rules! stock {
    ($symbol:expr, $name:expr, $exchange:expr) => {
        LocalStock {
            symbol: $symbol,
            name: $name,
            exchange: $exchange,
        }
    };
}

/// 外部搜尋失敗時使用的常見股票清單，順序即為回傳順序
static LOCAL_STOCKS: &[LocalStock] = &[
    // 美股科技
    stock!("AAPL", "Apple Inc.", "NASDAQ"),
    stock!("GOOGL", "Alphabet Inc.", "NASDAQ"),
    stock!("MSFT", "Microsoft Corporation", "NASDAQ"),
    stock!("AMZN", "Amazon.com, Inc.", "NASDAQ"),
    stock!("META", "Meta Platforms, Inc.", "NASDAQ"),
    stock!("TSLA", "Tesla, Inc.", "NASDAQ"),
    stock!("NVDA", "NVIDIA Corporation", "NASDAQ"),
    stock!("AMD", "Advanced Micro Devices", "NASDAQ"),
    stock!("NFLX", "Netflix, Inc.", "NASDAQ"),
    stock!("CRM", "Salesforce, Inc.", "NYSE"),
    stock!("ORCL", "Oracle Corporation", "NYSE"),
    stock!("ADBE", "Adobe Inc.", "NASDAQ"),
    stock!("INTC", "Intel Corporation", "NASDAQ"),
    stock!("CSCO", "Cisco Systems, Inc.", "NASDAQ"),
    stock!("IBM", "IBM Corporation", "NYSE"),
    stock!("MDB", "MongoDB, Inc.", "NASDAQ"),
    stock!("SNOW", "Snowflake Inc.", "NYSE"),
    stock!("PLTR", "Palantir Technologies", "NYSE"),
    stock!("UBER", "Uber Technologies", "NYSE"),
    stock!("ABNB", "Airbnb, Inc.", "NASDAQ"),
    // 港股
    stock!("0700.HK", "Tencent 腾讯控股", "HKEX"),
    stock!("9988.HK", "Alibaba 阿里巴巴", "HKEX"),
    stock!("9618.HK", "JD.com 京东集团", "HKEX"),
    stock!("3690.HK", "Meituan 美团", "HKEX"),
    stock!("1810.HK", "Xiaomi 小米集团", "HKEX"),
    stock!("2318.HK", "Ping An 中国平安", "HKEX"),
    stock!("0005.HK", "HSBC 汇丰控股", "HKEX"),
    stock!("0939.HK", "CCB 建设银行", "HKEX"),
    stock!("1398.HK", "ICBC 工商银行", "HKEX"),
    stock!("0941.HK", "China Mobile 中国移动", "HKEX"),
    stock!("9999.HK", "NetEase 网易", "HKEX"),
    stock!("9888.HK", "Baidu 百度集团", "HKEX"),
    stock!("1024.HK", "Kuaishou 快手", "HKEX"),
    stock!("1211.HK", "BYD 比亚迪", "HKEX"),
    stock!("0175.HK", "Geely 吉利汽车", "HKEX"),
    stock!("9866.HK", "NIO 蔚来", "HKEX"),
    stock!("9868.HK", "XPeng 小鹏汽车", "HKEX"),
    stock!("2015.HK", "Li Auto 理想汽车", "HKEX"),
    stock!("9626.HK", "Bilibili 哔哩哔哩", "HKEX"),
    stock!("6862.HK", "Haidilao 海底捞", "HKEX"),
    stock!("9633.HK", "Nongfu Spring 农夫山泉", "HKEX"),
    stock!("2331.HK", "Li Ning 李宁", "HKEX"),
    stock!("2020.HK", "ANTA Sports 安踏体育", "HKEX"),
    stock!("0388.HK", "HKEX 香港交易所", "HKEX"),
    stock!("1299.HK", "AIA 友邦保险", "HKEX"),
    stock!("2269.HK", "WuXi Biologics 药明生物", "HKEX"),
    stock!("0981.HK", "SMIC 中芯国际", "HKEX"),
    stock!("3968.HK", "CMB 招商银行", "HKEX"),
    stock!("2319.HK", "Mengniu 蒙牛乳业", "HKEX"),
    stock!("9961.HK", "Trip.com 携程集团", "HKEX"),
    // 美股金融與消費
    stock!("JPM", "JPMorgan Chase", "NYSE"),
    stock!("V", "Visa Inc.", "NYSE"),
    stock!("MA", "Mastercard", "NYSE"),
    stock!("BAC", "Bank of America", "NYSE"),
    stock!("WMT", "Walmart Inc.", "NYSE"),
    stock!("DIS", "Walt Disney Company", "NYSE"),
    stock!("NKE", "Nike, Inc.", "NYSE"),
    stock!("KO", "Coca-Cola Company", "NYSE"),
    stock!("PEP", "PepsiCo, Inc.", "NASDAQ"),
    stock!("MCD", "McDonald's Corporation", "NYSE"),
    stock!("SBUX", "Starbucks Corporation", "NASDAQ"),
    // 中概股 ADR
    stock!("BABA", "Alibaba (ADR) 阿里巴巴", "NYSE"),
    stock!("JD", "JD.com (ADR) 京东", "NASDAQ"),
    stock!("PDD", "PDD Holdings 拼多多", "NASDAQ"),
    stock!("BIDU", "Baidu (ADR) 百度", "NASDAQ"),
    stock!("NIO", "NIO Inc. (ADR) 蔚来", "NYSE"),
    stock!("XPEV", "XPeng (ADR) 小鹏汽车", "NYSE"),
    stock!("LI", "Li Auto (ADR) 理想汽车", "NASDAQ"),
    stock!("BILI", "Bilibili (ADR) 哔哩哔哩", "NASDAQ"),
    stock!("TME", "Tencent Music 腾讯音乐", "NYSE"),
    stock!("NTES", "NetEase (ADR) 网易", "NASDAQ"),
    // 上交所
    stock!("600519.SS", "Kweichow Moutai 贵州茅台", "SSE"),
    stock!("601318.SS", "Ping An Insurance 中国平安", "SSE"),
    stock!("600036.SS", "China Merchants Bank 招商银行", "SSE"),
    stock!("600276.SS", "Hengrui Medicine 恒瑞医药", "SSE"),
    stock!("600900.SS", "China Yangtze Power 长江电力", "SSE"),
    stock!("601012.SS", "LONGi Green Energy 隆基绿能", "SSE"),
    stock!("600030.SS", "CITIC Securities 中信证券", "SSE"),
    stock!("603259.SS", "WuXi AppTec 药明康德", "SSE"),
    stock!("600887.SS", "Yili Industrial 伊利股份", "SSE"),
    stock!("601888.SS", "China Tourism Group Duty Free 中国中免", "SSE"),
    stock!("600309.SS", "Wanhua Chemical 万华化学", "SSE"),
    stock!("601166.SS", "Industrial Bank 兴业银行", "SSE"),
    stock!("600585.SS", "Anhui Conch Cement 海螺水泥", "SSE"),
    stock!("601398.SS", "ICBC 工商银行", "SSE"),
    stock!("601939.SS", "CCB 建设银行", "SSE"),
    stock!("601288.SS", "ABC 农业银行", "SSE"),
    stock!("600000.SS", "Shanghai Pudong Development Bank 浦发银行", "SSE"),
    stock!("600016.SS", "China Minsheng Bank 民生银行", "SSE"),
    stock!("601857.SS", "PetroChina 中国石油", "SSE"),
    stock!("600028.SS", "Sinopec 中国石化", "SSE"),
    stock!("601668.SS", "CSCEC 中国建筑", "SSE"),
    stock!("600104.SS", "SAIC Motor 上汽集团", "SSE"),
    stock!("601601.SS", "CPIC 中国太保", "SSE"),
    stock!("600050.SS", "China Unicom 中国联通", "SSE"),
    stock!("601088.SS", "China Shenhua Energy 中国神华", "SSE"),
    // 深交所
    stock!("000858.SZ", "Wuliangye 五粮液", "SZSE"),
    stock!("000333.SZ", "Midea Group 美的集团", "SZSE"),
    stock!("002594.SZ", "BYD 比亚迪", "SZSE"),
    stock!("000651.SZ", "Gree Electric 格力电器", "SZSE"),
    stock!("002415.SZ", "Hikvision 海康威视", "SZSE"),
    stock!("300750.SZ", "CATL 宁德时代", "SZSE"),
    stock!("002304.SZ", "Yanghe 洋河股份", "SZSE"),
    stock!("000001.SZ", "Ping An Bank 平安银行", "SZSE"),
    stock!("002142.SZ", "Bank of Ningbo 宁波银行", "SZSE"),
    stock!("000568.SZ", "Luzhou Laojiao 泸州老窖", "SZSE"),
    stock!("002714.SZ", "Muyuan Foods 牧原股份", "SZSE"),
    stock!("000002.SZ", "China Vanke 万科A", "SZSE"),
    stock!("002352.SZ", "S.F. Holding 顺丰控股", "SZSE"),
    stock!("300059.SZ", "East Money 东方财富", "SZSE"),
    stock!("002475.SZ", "Luxshare Precision 立讯精密", "SZSE"),
    stock!("300760.SZ", "Mindray Medical 迈瑞医疗", "SZSE"),
    stock!("002027.SZ", "Focus Media 分众传媒", "SZSE"),
    stock!("000725.SZ", "BOE Technology 京东方A", "SZSE"),
    stock!("002236.SZ", "Dahua Technology 大华股份", "SZSE"),
    stock!("300274.SZ", "Sungrow Power 阳光电源", "SZSE"),
    stock!("000063.SZ", "ZTE Corporation 中兴通讯", "SZSE"),
    stock!("002230.SZ", "iFlytek 科大讯飞", "SZSE"),
    stock!("000100.SZ", "TCL Technology TCL科技", "SZSE"),
    stock!("002371.SZ", "Naura Technology 北方华创", "SZSE"),
    stock!("300124.SZ", "Inovance Technology 汇川技术", "SZSE"),
];

/// 代號或名稱包含查詢字串(不分大小寫)者，依清單順序最多取 10 筆
pub fn search(query: &str) -> Vec<SearchResult> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    LOCAL_STOCKS
        .iter()
        .filter(|s| {
            s.symbol.to_lowercase().contains(&term) || s.name.to_lowercase().contains(&term)
        })
        .take(MAX_RESULTS)
        .map(|s| SearchResult::new(s.symbol, s.name, s.exchange))
        .collect()
}
